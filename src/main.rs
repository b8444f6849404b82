use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use sra_search_workflow::api::config_dto::PipelineConfig;
use sra_search_workflow::error::Error;
use sra_search_workflow::loader::parser::parse_json_file;
use sra_search_workflow::submission::file_submitter::FileSubmitter;
use sra_search_workflow::submission::planner_submitter::PlannerSubmitter;
use sra_search_workflow::submission::submitter_trait::WorkflowSubmitter;
use sra_search_workflow::{generate_workflow, logger};

/// Generate a workflow that aligns SRA samples against a reference and merges the results.
#[derive(Parser, Debug)]
#[command(name = "sra-search", version, about)]
struct Cli {
    /// List of SRA ids to include in the search, one per line
    #[arg(long)]
    sra_id_list: PathBuf,

    /// FASTA file used as the alignment reference
    #[arg(long)]
    reference: PathBuf,

    /// Optional JSON generator configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving the run directory with the workflow document
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Planner executable invoked on the written workflow
    #[arg(long, default_value = "pegasus-plan")]
    planner: PathBuf,

    /// Write the workflow document without invoking the planner
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The planner's own output is what the user needs to see.
            if let Some(Error::PlanningError { output }) = e.downcast_ref::<Error>() {
                eprintln!("{}", output);
            }
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => parse_json_file::<PipelineConfig>(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => PipelineConfig::default(),
    };

    let pipeline = generate_workflow(&cli.sra_id_list, &cli.reference, config).context("failed to build workflow")?;

    let submitter: Box<dyn WorkflowSubmitter> = if cli.dry_run {
        Box::new(FileSubmitter::new(&cli.work_dir))
    } else {
        Box::new(PlannerSubmitter::new(&cli.work_dir, &cli.planner))
    };

    let receipt = pipeline.workflow.submit(submitter.as_ref())?;
    log::info!("Run {} written to '{}'.", receipt.run_id, receipt.run_dir.display());
    if let Some(output) = receipt.planner_output {
        println!("{}", output);
    }
    Ok(())
}
