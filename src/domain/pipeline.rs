use std::path::Path;

use crate::api::config_dto::PipelineConfig;
use crate::domain::catalog::replica_catalog::ReplicaCatalog;
use crate::domain::catalog::transformation_catalog::{Namespace, Profile, Transformation, TransformationCatalog};
use crate::domain::merge_tree::{MERGE_TRANSFORMATION, MergeTree, MergeTreeBuilder};
use crate::domain::properties::Properties;
use crate::domain::utils::id::JobId;
use crate::domain::workflow::Workflow;
use crate::error::Result;

pub const INDEX_TRANSFORMATION: &str = "bowtie2-build";
pub const ALIGN_TRANSFORMATION: &str = "bowtie2";
pub const FETCH_TRANSFORMATION: &str = "fasterq-dump";

/// Logical name of the reference sequence in the replica catalog.
pub const REFERENCE_FILE: &str = "reference.fna";
const INDEX_BASENAME: &str = "reference";

/// Files written by the index build and read by every alignment job.
pub const INDEX_FILES: [&str; 6] = [
    "reference.1.bt2",
    "reference.2.bt2",
    "reference.3.bt2",
    "reference.4.bt2",
    "reference.rev.1.bt2",
    "reference.rev.2.bt2",
];

/// The fetch and alignment job created for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleJobs {
    pub sample_id: String,
    pub fetch: JobId,
    pub align: JobId,
}

/// A fully assembled workflow together with the ids of its main jobs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub workflow: Workflow,
    pub index_job: JobId,
    pub samples: Vec<SampleJobs>,
    pub merge_tree: Option<MergeTree>,
}

/// Assembles the SRA search workflow: one shared index build, a fetch and
/// an alignment job per sample, and a merge tree over all alignments.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    merge_tree: MergeTreeBuilder,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let merge_tree = MergeTreeBuilder::new(config.max_fan_in)?;
        Ok(PipelineBuilder { config, merge_tree })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Keeps the trimmed lines that are at least `min_sample_id_length` long.
    pub fn sample_ids<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.as_ref().trim())
            .filter(|id| {
                let keep = id.chars().count() >= self.config.min_sample_id_length;
                if !keep {
                    log::debug!("Skipping short sample list line {:?}", id);
                }
                keep
            })
            .map(str::to_string)
            .collect()
    }

    pub fn transformation_catalog(&self) -> Result<TransformationCatalog> {
        let container = self.config.container.clone();
        let memory = &self.config.memory;
        let tools_dir = std::path::absolute(&self.config.tools_dir)?;
        let tool = |name: &str| tools_dir.join(name).display().to_string();

        let mut tc = TransformationCatalog::new();
        tc.add_transformation(
            Transformation::new(INDEX_TRANSFORMATION, "incontainer", "/opt/bowtie2-2.2.9/bowtie2-build", false)
                .with_container(&container)
                .with_profile(Profile::request_memory(&memory.index)),
        )?;
        tc.add_transformation(
            Transformation::new(ALIGN_TRANSFORMATION, "local", tool("bowtie2_wrapper"), true)
                .with_container(&container)
                .with_profile(Profile::request_memory(&memory.align)),
        )?;
        tc.add_transformation(
            Transformation::new(FETCH_TRANSFORMATION, "local", tool("fasterq_dump_wrapper"), true)
                .with_container(&container)
                .with_profile(Profile::request_memory(&memory.fetch))
                // Ties fetch jobs to the concurrency limit in `properties()`.
                .with_profile(Profile::new(Namespace::Dagman, "category", FETCH_TRANSFORMATION)),
        )?;
        tc.add_transformation(
            Transformation::new(MERGE_TRANSFORMATION, "local", tool("merge"), true)
                .with_container(&container)
                .with_profile(Profile::request_memory(&memory.merge)),
        )?;
        tc.add_container(container);
        Ok(tc)
    }

    pub fn replica_catalog(&self, reference: &Path) -> Result<ReplicaCatalog> {
        let reference = std::path::absolute(reference)?;
        let mut rc = ReplicaCatalog::new();
        rc.add_replica("local", REFERENCE_FILE, reference.display().to_string())?;
        Ok(rc)
    }

    pub fn properties(&self) -> Properties {
        let mut properties = Properties::new();
        properties.set(
            format!("dagman.{}.maxjobs", FETCH_TRANSFORMATION),
            self.config.fetch_concurrency.to_string(),
        );
        properties.extend(self.config.properties.clone());
        properties
    }

    /// Builds the complete workflow for the raw lines of a sample list.
    pub fn build<S: AsRef<str>>(&self, sample_lines: &[S], reference: &Path) -> Result<Pipeline> {
        let mut workflow = Workflow::new(
            self.config.workflow_name.clone(),
            self.transformation_catalog()?,
            self.replica_catalog(reference)?,
        );
        workflow.set_properties(self.properties());

        let index_job = self.add_index_job(&mut workflow)?;

        let sample_ids = self.sample_ids(sample_lines);
        log::info!("Using {} of {} sample list lines.", sample_ids.len(), sample_lines.len());

        let mut samples = Vec::with_capacity(sample_ids.len());
        for sample_id in sample_ids {
            samples.push(self.add_sample(&mut workflow, sample_id)?);
        }

        let leaves: Vec<JobId> = samples.iter().map(|sample| sample.align.clone()).collect();
        let merge_tree = self.merge_tree.build(&mut workflow, &leaves)?;

        Ok(Pipeline { workflow, index_job, samples, merge_tree })
    }

    fn add_index_job(&self, workflow: &mut Workflow) -> Result<JobId> {
        let job = workflow.add_job(
            INDEX_TRANSFORMATION,
            vec![REFERENCE_FILE.to_string(), INDEX_BASENAME.to_string()],
        )?;
        workflow.declare_input(&job, REFERENCE_FILE)?;
        for index_file in INDEX_FILES {
            workflow.declare_output(&job, index_file, false)?;
        }
        Ok(job)
    }

    fn add_sample(&self, workflow: &mut Workflow, sample_id: String) -> Result<SampleJobs> {
        let fastq_1 = format!("{}_1.fastq", sample_id);
        let fastq_2 = format!("{}_2.fastq", sample_id);

        let fetch = workflow.add_job(FETCH_TRANSFORMATION, vec!["--split-files".to_string(), sample_id.clone()])?;
        workflow.declare_output(&fetch, fastq_1.as_str(), false)?;
        workflow.declare_output(&fetch, fastq_2.as_str(), false)?;

        let align = workflow.add_job(ALIGN_TRANSFORMATION, vec![sample_id.clone()])?;
        for index_file in INDEX_FILES {
            workflow.declare_input(&align, index_file)?;
        }
        workflow.declare_input(&align, fastq_1)?;
        workflow.declare_input(&align, fastq_2)?;
        workflow.declare_output(&align, format!("{}.bam", sample_id), false)?;
        workflow.declare_output(&align, format!("{}.bam.bai", sample_id), false)?;

        log::debug!("Added sample {}: fetch {}, align {}", sample_id, fetch, align);
        Ok(SampleJobs { sample_id, fetch, align })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_lines_are_skipped() {
        let builder = PipelineBuilder::new(PipelineConfig::default()).unwrap();
        let lines = ["SRR1234567", "", "   ", "SRR1", "  ERR12345  ", "abcd"];

        assert_eq!(builder.sample_ids(&lines), vec!["SRR1234567".to_string(), "ERR12345".to_string()]);
    }

    #[test]
    fn test_invalid_fan_in_fails_before_building() {
        let config = PipelineConfig { max_fan_in: 1, ..PipelineConfig::default() };
        assert!(matches!(PipelineBuilder::new(config), Err(crate::error::Error::InvalidFanInError(1))));
    }

    #[test]
    fn test_fetch_concurrency_property() {
        let mut config = PipelineConfig { fetch_concurrency: 7, ..PipelineConfig::default() };
        config.properties.insert("pegasus.mode".to_string(), "development".to_string());
        let builder = PipelineBuilder::new(config).unwrap();

        let properties = builder.properties();
        assert_eq!(properties.get("dagman.fasterq-dump.maxjobs"), Some("7"));
        assert_eq!(properties.get("pegasus.mode"), Some("development"));
    }

    #[test]
    fn test_catalog_binds_all_transformations() {
        let builder = PipelineBuilder::new(PipelineConfig::default()).unwrap();
        let tc = builder.transformation_catalog().unwrap();

        for name in [INDEX_TRANSFORMATION, ALIGN_TRANSFORMATION, FETCH_TRANSFORMATION, MERGE_TRANSFORMATION] {
            let transformation = tc.get(name).unwrap();
            assert_eq!(transformation.container.as_deref(), Some("sra-search"));
        }
        assert!(!tc.get(INDEX_TRANSFORMATION).unwrap().is_stageable);
        assert!(tc.get(ALIGN_TRANSFORMATION).unwrap().pfn.ends_with("bowtie2_wrapper"));
        assert!(
            tc.get(FETCH_TRANSFORMATION)
                .unwrap()
                .profiles
                .contains(&Profile::new(Namespace::Dagman, "category", "fasterq-dump"))
        );
        assert_eq!(tc.containers.len(), 1);
    }
}
