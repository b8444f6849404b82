use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("File '{0}' is already declared in this workflow")]
    DuplicateFileError(String),

    #[error("Job '{job}' declares input '{file}', which is neither produced by a job nor registered as a replica")]
    UnresolvedInputError { job: String, file: String },

    #[error("Merge fan-in must be at least 2, got {0}")]
    InvalidFanInError(usize),

    #[error("Job '{0}' is not part of this workflow")]
    UnknownJobError(String),

    #[error("Transformation '{0}' is not registered in the transformation catalog")]
    UnknownTransformationError(String),

    #[error("Transformation '{0}' is already registered in the transformation catalog")]
    DuplicateTransformationError(String),

    #[error("Dependency {parent} -> {child} would introduce a cycle")]
    CycleDetectedError { parent: String, child: String },

    #[error("Planning the workflow failed:\n{output}")]
    PlanningError { output: String },
}

pub type Result<T> = std::result::Result<T, Error>;
