use crate::domain::catalog::transformation_catalog::Profile;
use crate::domain::utils::id::{FileName, JobId};

/// An output file of a job together with its staging policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: FileName,

    /// `true` if the file must survive outside the engine's scratch storage.
    pub persist: bool,
}

/// One invocation of a transformation in the workflow graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub transformation: String,
    pub arguments: Vec<String>,

    /// Declaration order is kept; a file appears at most once.
    pub inputs: Vec<FileName>,
    pub outputs: Vec<OutputFile>,

    /// Per-job resource hints, on top of the transformation's own profiles.
    pub profiles: Vec<Profile>,
}

impl Job {
    pub fn new(id: JobId, transformation: impl Into<String>, arguments: Vec<String>) -> Self {
        Job {
            id,
            transformation: transformation.into(),
            arguments,
            inputs: Vec::new(),
            outputs: Vec::new(),
            profiles: Vec::new(),
        }
    }

    pub fn output_names(&self) -> impl Iterator<Item = &FileName> {
        self.outputs.iter().map(|output| &output.name)
    }

    pub fn uses_input(&self, file: &FileName) -> bool {
        self.inputs.contains(file)
    }
}
