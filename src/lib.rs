use std::path::Path;

use crate::api::config_dto::PipelineConfig;
use crate::domain::pipeline::{Pipeline, PipelineBuilder};
use crate::error::Result;
use crate::loader::parser::read_lines;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod submission;

/// Reads the sample list and assembles the complete workflow graph.
pub fn generate_workflow(sample_list: &Path, reference: &Path, config: PipelineConfig) -> Result<Pipeline> {
    let builder = PipelineBuilder::new(config)?;

    let lines = read_lines(sample_list)?;
    log::info!("Read {} lines from '{}'.", lines.len(), sample_list.display());

    let pipeline = builder.build(&lines, reference)?;
    log::info!(
        "Workflow '{}' assembled: {} jobs, {} samples.",
        pipeline.workflow.name,
        pipeline.workflow.job_count(),
        pipeline.samples.len()
    );
    Ok(pipeline)
}
