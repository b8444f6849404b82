use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::transformation_catalog::{Container, ContainerKind};

/// Generator settings, read from an optional JSON file.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    pub workflow_name: String,

    /// Upper bound on the number of parent jobs feeding one merge job.
    pub max_fan_in: usize,

    /// Sample-list lines shorter than this (after trimming) are skipped.
    pub min_sample_id_length: usize,

    /// Concurrent download limit, emitted as a planner property.
    pub fetch_concurrency: u32,

    /// Directory holding the wrapper scripts staged by the engine.
    pub tools_dir: String,

    pub container: Container,
    pub memory: MemoryConfig,

    /// Extra planner properties, merged over the generated ones.
    pub properties: BTreeMap<String, String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            workflow_name: "sra-search".to_string(),
            max_fan_in: 25,
            min_sample_id_length: 5,
            fetch_concurrency: 20,
            tools_dir: "tools".to_string(),
            container: Container {
                name: "sra-search".to_string(),
                kind: ContainerKind::Singularity,
                image: "docker://pegasus/sra-search:latest".to_string(),
            },
            memory: MemoryConfig::default(),
            properties: BTreeMap::new(),
        }
    }
}

/// `request_memory` values per transformation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MemoryConfig {
    pub index: String,
    pub align: String,
    pub fetch: String,
    pub merge: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig {
            index: "1 GB".to_string(),
            align: "2 GB".to_string(),
            fetch: "1 GB".to_string(),
            merge: "1 GB".to_string(),
        }
    }
}
