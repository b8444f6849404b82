use serde::{Deserialize, Serialize};

use crate::domain::utils::id::FileName;
use crate::error::{Error, Result};

/// Physical location of a file that exists before the workflow runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Replica {
    pub site: String,
    pub lfn: String,
    pub pfn: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicaCatalog {
    pub replicas: Vec<Replica>,
}

impl ReplicaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_replica(&mut self, site: impl Into<String>, lfn: impl Into<String>, pfn: impl Into<String>) -> Result<()> {
        let lfn = lfn.into();
        if self.contains(&lfn) {
            return Err(Error::DuplicateFileError(lfn));
        }
        self.replicas.push(Replica { site: site.into(), lfn, pfn: pfn.into() });
        Ok(())
    }

    pub fn contains(&self, lfn: &str) -> bool {
        self.replicas.iter().any(|r| r.lfn == lfn)
    }

    /// Logical names of all registered replicas, in registration order.
    pub fn file_names(&self) -> impl Iterator<Item = FileName> + '_ {
        self.replicas.iter().map(|r| FileName::new(r.lfn.as_str()))
    }
}
