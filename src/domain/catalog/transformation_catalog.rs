use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Profile namespace understood by the execution engine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Resource requests for the batch system, e.g. `request_memory`.
    Condor,
    /// Scheduler directives, e.g. `category` for concurrency throttling.
    Dagman,
    Env,
    Pegasus,
}

/// A key/value hint attached to a transformation or a single job.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub namespace: Namespace,
    pub key: String,
    pub value: String,
}

impl Profile {
    pub fn new(namespace: Namespace, key: impl Into<String>, value: impl Into<String>) -> Self {
        Profile { namespace, key: key.into(), value: value.into() }
    }

    pub fn request_memory(value: impl Into<String>) -> Self {
        Profile::new(Namespace::Condor, "request_memory", value)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Docker,
    Singularity,
    Shifter,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub kind: ContainerKind,
    pub image: String,
}

/// Binding of a logical transformation name to an executable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    pub name: String,
    pub site: String,
    pub pfn: String,
    pub container: Option<String>,

    /// Whether the executable must be shipped to the execution site.
    pub is_stageable: bool,
    pub profiles: Vec<Profile>,
}

impl Transformation {
    pub fn new(name: impl Into<String>, site: impl Into<String>, pfn: impl Into<String>, is_stageable: bool) -> Self {
        Transformation {
            name: name.into(),
            site: site.into(),
            pfn: pfn.into(),
            container: None,
            is_stageable,
            profiles: Vec::new(),
        }
    }

    pub fn with_container(mut self, container: &Container) -> Self {
        self.container = Some(container.name.clone());
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationCatalog {
    pub containers: Vec<Container>,
    pub transformations: Vec<Transformation>,
}

impl TransformationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_container(&mut self, container: Container) {
        self.containers.push(container);
    }

    /// Registers a transformation. A name may only be bound once.
    pub fn add_transformation(&mut self, transformation: Transformation) -> Result<()> {
        if self.contains(&transformation.name) {
            return Err(Error::DuplicateTransformationError(transformation.name));
        }
        log::debug!("Registered transformation '{}' -> {}", transformation.name, transformation.pfn);
        self.transformations.push(transformation);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Transformation> {
        self.transformations.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_transformation_is_rejected() {
        let mut catalog = TransformationCatalog::new();
        catalog.add_transformation(Transformation::new("merge", "local", "/bin/merge", true)).unwrap();

        let result = catalog.add_transformation(Transformation::new("merge", "local", "/other/merge", true));
        assert!(matches!(result, Err(Error::DuplicateTransformationError(name)) if name == "merge"));
        assert_eq!(catalog.get("merge").unwrap().pfn, "/bin/merge");
    }

    #[test]
    fn test_profiles_serialize_lowercase_namespace() {
        let json = serde_json::to_value(Profile::request_memory("1 GB")).unwrap();
        assert_eq!(json["namespace"], "condor");
        assert_eq!(json["key"], "request_memory");
    }
}
