use std::path::PathBuf;
use std::process::Command;

use crate::api::workflow_dto::WorkflowDto;
use crate::error::{Error, Result};
use crate::submission::file_submitter::FileSubmitter;
use crate::submission::submitter_trait::{SubmissionReceipt, WorkflowSubmitter};

/// Writes the document like [`FileSubmitter`] and then runs the external
/// planner on it:
///
/// `<planner> --conf <properties> --dir <run dir>/submit --submit <workflow.json>`
#[derive(Debug, Clone)]
pub struct PlannerSubmitter {
    files: FileSubmitter,
    planner: PathBuf,
}

impl PlannerSubmitter {
    pub fn new(work_dir: impl Into<PathBuf>, planner: impl Into<PathBuf>) -> Self {
        PlannerSubmitter { files: FileSubmitter::new(work_dir), planner: planner.into() }
    }
}

impl WorkflowSubmitter for PlannerSubmitter {
    fn submit(&self, workflow: &WorkflowDto) -> Result<SubmissionReceipt> {
        let mut receipt = self.files.write(workflow)?;

        let mut command = Command::new(&self.planner);
        command
            .arg("--conf")
            .arg(&receipt.properties_file)
            .arg("--dir")
            .arg(receipt.run_dir.join("submit"))
            .arg("--submit")
            .arg(&receipt.workflow_file);
        log::info!("Running planner: {:?}", command);

        let output = command.output().map_err(|e| Error::PlanningError {
            output: format!("Failed to launch planner '{}': {}", self.planner.display(), e),
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            log::error!("Planner exited with {}.", output.status);
            return Err(Error::PlanningError { output: combined });
        }

        log::info!("Workflow '{}' planned and submitted.", workflow.name);
        receipt.planner_output = Some(combined);
        Ok(receipt)
    }
}
