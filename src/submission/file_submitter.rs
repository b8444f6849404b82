use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::api::workflow_dto::WorkflowDto;
use crate::error::Result;
use crate::submission::submitter_trait::{SubmissionReceipt, WorkflowSubmitter};

pub const WORKFLOW_FILE: &str = "workflow.json";
pub const PROPERTIES_FILE: &str = "pegasus.properties";

/// Writes the workflow document and planner properties into a fresh run
/// directory below `work_dir`. Used on its own for dry runs.
#[derive(Debug, Clone)]
pub struct FileSubmitter {
    work_dir: PathBuf,
}

impl FileSubmitter {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        FileSubmitter { work_dir: work_dir.into() }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Creates `<work_dir>/<workflow name>-<run id>` and writes both files into it.
    pub fn write(&self, workflow: &WorkflowDto) -> Result<SubmissionReceipt> {
        let run_id = Uuid::new_v4();
        let run_dir = self.work_dir.join(format!("{}-{}", workflow.name, run_id.simple()));
        fs::create_dir_all(&run_dir)?;

        let workflow_file = run_dir.join(WORKFLOW_FILE);
        fs::write(&workflow_file, serde_json::to_string_pretty(workflow)?)?;

        let properties_file = run_dir.join(PROPERTIES_FILE);
        fs::write(&properties_file, workflow.properties.render())?;

        log::info!("Wrote workflow document to '{}'.", workflow_file.display());

        Ok(SubmissionReceipt { run_id, run_dir, workflow_file, properties_file, planner_output: None })
    }
}

impl WorkflowSubmitter for FileSubmitter {
    fn submit(&self, workflow: &WorkflowDto) -> Result<SubmissionReceipt> {
        self.write(workflow)
    }
}
