pub mod file_submitter;
pub mod planner_submitter;
pub mod submitter_trait;
