use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::api::workflow_dto::{DependencyDto, JobDto, OutputFileDto, WorkflowDto};
use crate::domain::catalog::replica_catalog::ReplicaCatalog;
use crate::domain::catalog::transformation_catalog::{Profile, TransformationCatalog};
use crate::domain::job::{Job, OutputFile};
use crate::domain::properties::Properties;
use crate::domain::utils::id::{FileName, JobId};
use crate::error::{Error, Result};
use crate::submission::submitter_trait::{SubmissionReceipt, WorkflowSubmitter};

/// Where a logical file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOrigin {
    /// Registered in the replica catalog before any job was added.
    Replica,
    /// Declared as output of a job in this workflow.
    Produced { job: JobId, persist: bool },
}

/// The job/file/dependency registry of a single workflow.
///
/// Every declaration is checked at the registry boundary: file names are
/// unique, inputs resolve to a producer or a replica, and no edge may close a
/// cycle. A `Workflow` is consumed by [`Workflow::submit`].
#[derive(Debug, Clone)]
pub struct Workflow {
    pub name: String,

    transformation_catalog: TransformationCatalog,
    replica_catalog: ReplicaCatalog,
    properties: Properties,

    // Creation order is kept so the emitted document is deterministic.
    jobs: Vec<Job>,
    job_index: HashMap<JobId, usize>,
    files: HashMap<FileName, FileOrigin>,

    /// child -> parents
    parents: HashMap<JobId, BTreeSet<JobId>>,
    /// parent -> children
    children: HashMap<JobId, BTreeSet<JobId>>,
}

impl Workflow {
    pub fn new(
        name: impl Into<String>,
        transformation_catalog: TransformationCatalog,
        replica_catalog: ReplicaCatalog,
    ) -> Self {
        let files = replica_catalog.file_names().map(|name| (name, FileOrigin::Replica)).collect();

        Workflow {
            name: name.into(),
            transformation_catalog,
            replica_catalog,
            properties: Properties::new(),
            jobs: Vec::new(),
            job_index: HashMap::new(),
            files,
            parents: HashMap::new(),
            children: HashMap::new(),
        }
    }

    pub fn set_properties(&mut self, properties: Properties) {
        self.properties = properties;
    }

    /// Adds a job running `transformation` and returns its generated id.
    pub fn add_job(&mut self, transformation: &str, arguments: Vec<String>) -> Result<JobId> {
        if !self.transformation_catalog.contains(transformation) {
            return Err(Error::UnknownTransformationError(transformation.to_string()));
        }

        let job_id = JobId::new(format!("ID{:07}", self.jobs.len() + 1));
        log::trace!("Adding job {} ({})", job_id, transformation);

        self.job_index.insert(job_id.clone(), self.jobs.len());
        self.jobs.push(Job::new(job_id.clone(), transformation, arguments));
        Ok(job_id)
    }

    pub fn declare_output(&mut self, job: &JobId, file: impl Into<FileName>, persist: bool) -> Result<()> {
        let file = file.into();
        let index = self.index_of(job)?;

        if self.files.contains_key(&file) {
            return Err(Error::DuplicateFileError(file.into()));
        }

        self.files.insert(file.clone(), FileOrigin::Produced { job: job.clone(), persist });
        self.jobs[index].outputs.push(OutputFile { name: file, persist });
        Ok(())
    }

    /// Declares `file` as input of `job` and adds the implied edge from its producer.
    pub fn declare_input(&mut self, job: &JobId, file: impl Into<FileName>) -> Result<()> {
        let file = file.into();
        let index = self.index_of(job)?;

        let producer = match self.files.get(&file) {
            None => {
                return Err(Error::UnresolvedInputError { job: job.to_string(), file: file.into() });
            }
            Some(FileOrigin::Replica) => None,
            Some(FileOrigin::Produced { job: producer, .. }) => Some(producer.clone()),
        };

        if self.jobs[index].uses_input(&file) {
            return Ok(());
        }

        if let Some(producer) = producer {
            self.link(&producer, job)?;
        }
        self.jobs[index].inputs.push(file);
        Ok(())
    }

    /// Adds an explicit edge that is not implied by input/output matching.
    pub fn add_dependency(&mut self, parent: &JobId, child: &JobId) -> Result<()> {
        self.index_of(parent)?;
        self.index_of(child)?;
        self.link(parent, child)
    }

    pub fn add_profile(&mut self, job: &JobId, profile: Profile) -> Result<()> {
        let index = self.index_of(job)?;
        self.jobs[index].profiles.push(profile);
        Ok(())
    }

    pub fn job(&self, job: &JobId) -> Option<&Job> {
        self.job_index.get(job).map(|&index| &self.jobs[index])
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn file_origin(&self, file: &FileName) -> Option<&FileOrigin> {
        self.files.get(file)
    }

    pub fn parents(&self, job: &JobId) -> impl Iterator<Item = &JobId> {
        self.parents.get(job).into_iter().flatten()
    }

    pub fn children(&self, job: &JobId) -> impl Iterator<Item = &JobId> {
        self.children.get(job).into_iter().flatten()
    }

    pub fn edge_count(&self) -> usize {
        self.children.values().map(BTreeSet::len).sum()
    }

    /// Jobs without any parent, in creation order.
    pub fn entry_jobs(&self) -> Vec<JobId> {
        self.jobs.iter().filter(|job| self.parents(&job.id).next().is_none()).map(|job| job.id.clone()).collect()
    }

    /// Jobs without any child, in creation order.
    pub fn exit_jobs(&self) -> Vec<JobId> {
        self.jobs.iter().filter(|job| self.children(&job.id).next().is_none()).map(|job| job.id.clone()).collect()
    }

    pub fn transformation_catalog(&self) -> &TransformationCatalog {
        &self.transformation_catalog
    }

    pub fn replica_catalog(&self) -> &ReplicaCatalog {
        &self.replica_catalog
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Returns true if `to` can be reached from `from` along parent -> child edges.
    pub fn is_ancestor(&self, from: &JobId, to: &JobId) -> bool {
        let mut stack = vec![from];
        let mut visited: HashSet<&JobId> = HashSet::new();

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if visited.insert(current) {
                stack.extend(self.children(current));
            }
        }
        false
    }

    /// Kahn's algorithm over the job graph; ties are broken by creation order.
    pub fn topological_order(&self) -> Result<Vec<JobId>> {
        let mut in_degree: HashMap<&JobId, usize> =
            self.jobs.iter().map(|job| (&job.id, self.parents(&job.id).count())).collect();

        let mut queue: VecDeque<&JobId> =
            self.jobs.iter().map(|job| &job.id).filter(|id| in_degree[id] == 0).collect();
        let mut order = Vec::with_capacity(self.jobs.len());

        while let Some(current) = queue.pop_front() {
            order.push(current.clone());
            for child in self.children(current) {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(child);
                    }
                }
            }
        }

        if order.len() != self.jobs.len() {
            let stuck = self.jobs.iter().find(|job| in_degree[&job.id] > 0).map(|job| job.id.to_string()).unwrap_or_default();
            return Err(Error::CycleDetectedError { parent: stuck.clone(), child: stuck });
        }
        Ok(order)
    }

    /// Hands the finished graph to `submitter` in a single call.
    ///
    /// The workflow is consumed; nothing is retried on failure.
    pub fn submit(self, submitter: &dyn WorkflowSubmitter) -> Result<SubmissionReceipt> {
        self.topological_order()?;

        let document = WorkflowDto::from(&self);
        log::info!(
            "Submitting workflow '{}' with {} jobs and {} dependencies.",
            self.name,
            document.jobs.len(),
            self.edge_count()
        );
        submitter.submit(&document)
    }

    fn index_of(&self, job: &JobId) -> Result<usize> {
        self.job_index.get(job).copied().ok_or_else(|| Error::UnknownJobError(job.to_string()))
    }

    fn link(&mut self, parent: &JobId, child: &JobId) -> Result<()> {
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::CycleDetectedError { parent: parent.to_string(), child: child.to_string() });
        }

        self.children.entry(parent.clone()).or_default().insert(child.clone());
        self.parents.entry(child.clone()).or_default().insert(parent.clone());
        Ok(())
    }
}

impl From<&Workflow> for WorkflowDto {
    fn from(workflow: &Workflow) -> Self {
        let jobs = workflow
            .jobs
            .iter()
            .map(|job| JobDto {
                id: job.id.to_string(),
                transformation: job.transformation.clone(),
                arguments: job.arguments.clone(),
                inputs: job.inputs.iter().map(ToString::to_string).collect(),
                outputs: job
                    .outputs
                    .iter()
                    .map(|output| OutputFileDto { name: output.name.to_string(), persist: output.persist })
                    .collect(),
                profiles: job.profiles.clone(),
            })
            .collect();

        let dependencies = workflow
            .jobs
            .iter()
            .filter_map(|job| {
                let children: Vec<String> = workflow.children(&job.id).map(ToString::to_string).collect();
                (!children.is_empty()).then(|| DependencyDto { parent: job.id.to_string(), children })
            })
            .collect();

        WorkflowDto {
            name: workflow.name.clone(),
            jobs,
            dependencies,
            transformation_catalog: workflow.transformation_catalog.clone(),
            replica_catalog: workflow.replica_catalog.clone(),
            properties: workflow.properties.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::transformation_catalog::Transformation;

    fn mock_workflow() -> Workflow {
        let mut tc = TransformationCatalog::new();
        tc.add_transformation(Transformation::new("produce", "local", "/bin/produce", true)).unwrap();
        tc.add_transformation(Transformation::new("consume", "local", "/bin/consume", true)).unwrap();

        let mut rc = ReplicaCatalog::new();
        rc.add_replica("local", "input.txt", "/data/input.txt").unwrap();

        Workflow::new("test-wf", tc, rc)
    }

    #[test]
    fn test_job_ids_follow_creation_order() {
        let mut wf = mock_workflow();
        let first = wf.add_job("produce", vec![]).unwrap();
        let second = wf.add_job("consume", vec![]).unwrap();

        assert_eq!(first.as_str(), "ID0000001");
        assert_eq!(second.as_str(), "ID0000002");
        assert_eq!(wf.job_count(), 2);
    }

    #[test]
    fn test_unknown_transformation_is_rejected() {
        let mut wf = mock_workflow();
        let result = wf.add_job("missing", vec![]);
        assert!(matches!(result, Err(Error::UnknownTransformationError(name)) if name == "missing"));
        assert_eq!(wf.job_count(), 0);
    }

    #[test]
    fn test_input_of_produced_file_implies_edge() {
        let mut wf = mock_workflow();
        let producer = wf.add_job("produce", vec![]).unwrap();
        let consumer = wf.add_job("consume", vec![]).unwrap();

        wf.declare_input(&producer, "input.txt").unwrap();
        wf.declare_output(&producer, "out.txt", false).unwrap();
        wf.declare_input(&consumer, "out.txt").unwrap();

        assert_eq!(wf.parents(&consumer).collect::<Vec<_>>(), vec![&producer]);
        assert_eq!(wf.children(&producer).collect::<Vec<_>>(), vec![&consumer]);
        assert_eq!(wf.entry_jobs(), vec![producer.clone()]);
        assert_eq!(wf.exit_jobs(), vec![consumer.clone()]);
        assert_eq!(
            wf.file_origin(&FileName::new("out.txt")),
            Some(&FileOrigin::Produced { job: producer, persist: false })
        );
    }

    #[test]
    fn test_replica_input_adds_no_edge() {
        let mut wf = mock_workflow();
        let job = wf.add_job("consume", vec![]).unwrap();
        wf.declare_input(&job, "input.txt").unwrap();
        wf.declare_input(&job, "input.txt").unwrap();

        assert_eq!(wf.edge_count(), 0);
        assert_eq!(wf.job(&job).unwrap().inputs.len(), 1);
    }

    #[test]
    fn test_duplicate_output_is_rejected() {
        let mut wf = mock_workflow();
        let a = wf.add_job("produce", vec![]).unwrap();
        let b = wf.add_job("produce", vec![]).unwrap();
        wf.declare_output(&a, "out.txt", false).unwrap();

        let result = wf.declare_output(&b, "out.txt", true);
        assert!(matches!(result, Err(Error::DuplicateFileError(name)) if name == "out.txt"));
        assert!(wf.job(&b).unwrap().outputs.is_empty());
    }

    #[test]
    fn test_output_shadowing_replica_is_rejected() {
        let mut wf = mock_workflow();
        let a = wf.add_job("produce", vec![]).unwrap();
        let result = wf.declare_output(&a, "input.txt", false);
        assert!(matches!(result, Err(Error::DuplicateFileError(_))));
    }

    #[test]
    fn test_unresolved_input_is_rejected() {
        let mut wf = mock_workflow();
        let job = wf.add_job("consume", vec![]).unwrap();

        let result = wf.declare_input(&job, "nowhere.txt");
        match result {
            Err(Error::UnresolvedInputError { job: job_name, file }) => {
                assert_eq!(job_name, "ID0000001");
                assert_eq!(file, "nowhere.txt");
            }
            other => panic!("Expected UnresolvedInputError, got {:?}", other),
        }
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut wf = mock_workflow();
        let a = wf.add_job("produce", vec![]).unwrap();
        let b = wf.add_job("consume", vec![]).unwrap();
        wf.declare_output(&a, "a.out", false).unwrap();
        wf.declare_output(&b, "b.out", false).unwrap();
        wf.declare_input(&b, "a.out").unwrap();

        assert!(matches!(wf.declare_input(&a, "b.out"), Err(Error::CycleDetectedError { .. })));
        assert!(matches!(wf.add_dependency(&b, &a), Err(Error::CycleDetectedError { .. })));
        assert!(matches!(wf.declare_input(&a, "a.out"), Err(Error::CycleDetectedError { .. })));
        assert_eq!(wf.topological_order().unwrap(), vec![a, b]);
    }

    #[test]
    fn test_dependency_on_unknown_job_is_rejected() {
        let mut wf = mock_workflow();
        let a = wf.add_job("produce", vec![]).unwrap();
        let ghost = JobId::new("ID9999999");

        assert!(matches!(wf.add_dependency(&a, &ghost), Err(Error::UnknownJobError(id)) if id == "ID9999999"));
        assert!(matches!(wf.declare_output(&ghost, "x", false), Err(Error::UnknownJobError(_))));
    }

    #[test]
    fn test_document_lists_dependencies_per_parent() {
        let mut wf = mock_workflow();
        let a = wf.add_job("produce", vec!["--flag".to_string()]).unwrap();
        let b = wf.add_job("consume", vec![]).unwrap();
        let c = wf.add_job("consume", vec![]).unwrap();
        wf.declare_output(&a, "a.out", true).unwrap();
        wf.declare_input(&c, "a.out").unwrap();
        wf.declare_input(&b, "a.out").unwrap();
        wf.add_profile(&b, Profile::request_memory("4 GB")).unwrap();

        let document = WorkflowDto::from(&wf);
        assert_eq!(document.jobs.len(), 3);
        assert_eq!(document.jobs[0].arguments, vec!["--flag"]);
        assert_eq!(document.jobs[0].outputs, vec![OutputFileDto { name: "a.out".to_string(), persist: true }]);
        assert_eq!(document.jobs[1].profiles, vec![Profile::request_memory("4 GB")]);
        assert_eq!(
            document.dependencies,
            vec![DependencyDto { parent: a.to_string(), children: vec![b.to_string(), c.to_string()] }]
        );
    }
}
