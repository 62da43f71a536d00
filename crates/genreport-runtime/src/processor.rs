//! Single-file processing
//!
//! Reads one generation document, runs it through the core engine and writes
//! the result. A failure at any step abandons only this file; nothing is
//! written unless the whole document rendered.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use genreport_core::ReferenceData;
use genreport_core::engine::{GenerationReport, SkippedGenerator};

use crate::jobs::FileJob;

/// What processing one file produced
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// Input document
    pub input: PathBuf,
    /// Result document written
    pub output: PathBuf,
    /// Entries in `Totals`
    pub totals: usize,
    /// Entries in `MaxEmissionGenerators`
    pub max_emissions: usize,
    /// Entries in `ActualHeatRates`
    pub heat_rates: usize,
    /// Generators left out of the result
    pub skipped: Vec<SkippedGenerator>,
}

impl FileOutcome {
    fn new(job: &FileJob, report: GenerationReport) -> Self {
        Self {
            input: job.input.clone(),
            output: job.output.clone(),
            totals: report.totals.len(),
            max_emissions: report.max_emissions.len(),
            heat_rates: report.heat_rates.len(),
            skipped: report.skipped,
        }
    }
}

/// Transform the job's input file and write its result document
pub async fn process_file(job: &FileJob, reference: &ReferenceData) -> Result<FileOutcome> {
    tracing::debug!("Processing {}", job.input.display());

    let input = tokio::fs::read_to_string(&job.input)
        .await
        .with_context(|| format!("Failed to read {}", job.input.display()))?;

    let (report, rendered) = genreport_core::generate(&input, reference)
        .with_context(|| format!("Failed to transform {}", job.input.display()))?;

    tokio::fs::write(&job.output, rendered)
        .await
        .with_context(|| format!("Failed to write {}", job.output.display()))?;

    Ok(FileOutcome::new(job, report))
}
