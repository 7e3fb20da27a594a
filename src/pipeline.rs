//! Pipeline orchestrator. Each domain runs the same state machine:
//! generate, persist raw, reload raw, aggregate and render, autosize,
//! persist report. No branching; the first stage error aborts the run.

use std::fs;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::config::RunConfig;
use crate::dataset::{self, DatasetError};
use crate::generate::{self, GenerateError, LimsDataset, NhsDataset};
use crate::report::{self, ReportError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Generation failed: {0}")]
    Generate(#[from] GenerateError),

    #[error("Raw artifact error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Report rendering failed: {0}")]
    Report(#[from] ReportError),

    #[error("Could not create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Summary returned to the caller after one domain pipeline completes.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub domain: &'static str,
    pub raw_path: PathBuf,
    pub report_path: PathBuf,
    pub raw_rows: usize,
}

/// Runs the LIMS pipeline then the NHS pipeline.
pub fn run_all(config: &RunConfig) -> Result<Vec<PipelineOutcome>, PipelineError> {
    Ok(vec![run_lims(config)?, run_nhs(config)?])
}

pub fn run_lims(config: &RunConfig) -> Result<PipelineOutcome, PipelineError> {
    ensure_output_dir(config)?;
    let mut rng = seeded_rng(config.seed);

    tracing::info!(patients = config.lims.patients, "Generating LIMS dataset");
    let dataset = generate::lims::generate(&config.lims, config.now, &mut rng)?;
    let raw_rows = dataset.total_rows();

    let raw_path = config.lims_raw_path();
    dataset::write_raw(&raw_path, &dataset.tables())?;
    tracing::info!(path = %raw_path.display(), rows = raw_rows, "Raw LIMS artifact written");

    let tables = dataset::read_raw(&raw_path, LimsDataset::SHEETS)?;
    tracing::info!(sheets = tables.len(), "Raw LIMS artifact reloaded");

    let report_path = config.lims_report_path();
    report::lims::render(&tables, config.now, &config.lims_targets, &report_path)?;
    tracing::info!(path = %report_path.display(), "LIMS report written");

    Ok(PipelineOutcome {
        domain: "lims",
        raw_path,
        report_path,
        raw_rows,
    })
}

pub fn run_nhs(config: &RunConfig) -> Result<PipelineOutcome, PipelineError> {
    ensure_output_dir(config)?;
    let mut rng = seeded_rng(config.seed);

    tracing::info!(patients = config.nhs.patients, "Generating NHS dataset");
    let dataset = generate::nhs::generate(&config.nhs, config.now, &mut rng)?;
    let raw_rows = dataset.total_rows();

    let raw_path = config.nhs_raw_path();
    dataset::write_raw(&raw_path, &dataset.tables())?;
    tracing::info!(path = %raw_path.display(), rows = raw_rows, "Raw NHS artifact written");

    let tables = dataset::read_raw(&raw_path, NhsDataset::SHEETS)?;
    tracing::info!(sheets = tables.len(), "Raw NHS artifact reloaded");

    let report_path = config.nhs_report_path();
    report::nhs::render(&tables, config.now, &config.nhs_targets, &report_path)?;
    tracing::info!(path = %report_path.display(), "NHS report written");

    Ok(PipelineOutcome {
        domain: "nhs",
        raw_path,
        report_path,
        raw_rows,
    })
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn ensure_output_dir(config: &RunConfig) -> Result<(), PipelineError> {
    fs::create_dir_all(&config.output_dir).map_err(|source| PipelineError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })
}
