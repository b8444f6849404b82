use std::cell::RefCell;
use std::path::PathBuf;

use sra_search_workflow::api::workflow_dto::WorkflowDto;
use sra_search_workflow::error::{Error, Result};
use sra_search_workflow::submission::submitter_trait::{SubmissionReceipt, WorkflowSubmitter};

/// Records every submitted document instead of handing it to an engine.
#[derive(Debug, Default)]
pub struct MockSubmitter {
    pub submitted: RefCell<Vec<WorkflowDto>>,
    pub planner_failure: Option<String>,
}

impl MockSubmitter {
    pub fn new() -> MockSubmitter {
        MockSubmitter::default()
    }

    #[allow(dead_code)]
    pub fn failing(output: &str) -> MockSubmitter {
        MockSubmitter { submitted: RefCell::new(Vec::new()), planner_failure: Some(output.to_string()) }
    }
}

impl WorkflowSubmitter for MockSubmitter {
    fn submit(&self, workflow: &WorkflowDto) -> Result<SubmissionReceipt> {
        self.submitted.borrow_mut().push(workflow.clone());

        if let Some(output) = &self.planner_failure {
            return Err(Error::PlanningError { output: output.clone() });
        }

        Ok(SubmissionReceipt {
            run_id: uuid::Uuid::nil(),
            run_dir: PathBuf::from("mock"),
            workflow_file: PathBuf::from("mock/workflow.json"),
            properties_file: PathBuf::from("mock/pegasus.properties"),
            planner_output: None,
        })
    }
}
