use std::path::PathBuf;

use uuid::Uuid;

use crate::api::workflow_dto::WorkflowDto;
use crate::error::Result;

/// What a successful handoff leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub run_id: Uuid,
    pub run_dir: PathBuf,
    pub workflow_file: PathBuf,
    pub properties_file: PathBuf,

    /// Combined stdout/stderr of the planner, if one was invoked.
    pub planner_output: Option<String>,
}

/// The one-shot boundary to the external execution engine.
///
/// An implementation receives the complete workflow document exactly once and
/// either accepts it or fails with `Error::PlanningError`. Implementations do
/// not retry.
pub trait WorkflowSubmitter: std::fmt::Debug {
    fn submit(&self, workflow: &WorkflowDto) -> Result<SubmissionReceipt>;
}
