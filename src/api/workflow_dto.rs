use serde::{Deserialize, Serialize};

use crate::domain::catalog::replica_catalog::ReplicaCatalog;
use crate::domain::catalog::transformation_catalog::{Profile, TransformationCatalog};
use crate::domain::properties::Properties;

/// The document handed to the execution engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDto {
    pub name: String,
    pub jobs: Vec<JobDto>,
    pub dependencies: Vec<DependencyDto>,

    pub transformation_catalog: TransformationCatalog,
    pub replica_catalog: ReplicaCatalog,
    pub properties: Properties,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDto {
    pub id: String,
    pub transformation: String,
    pub arguments: Vec<String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<OutputFileDto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<Profile>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutputFileDto {
    pub name: String,
    pub persist: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DependencyDto {
    pub parent: String,
    pub children: Vec<String>,
}
