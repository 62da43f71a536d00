//! Watch-folder runtime
//!
//! Owns the configuration and the reference factors and drives every file
//! from an [`EventSource`] through [`process_file`], one at a time.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use genreport_core::{Config, ReferenceData};

use crate::jobs::FileJob;
use crate::processor::{FileOutcome, process_file};
use crate::watcher::{DirectoryWatcher, EventSource, ExistingFiles, FileFilter};

/// A file that could not be processed
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    /// Input document
    pub input: PathBuf,
    /// Error chain, outermost first
    pub error: String,
}

/// Totals for one pass over an event source
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Files that produced a result document
    pub processed: Vec<FileOutcome>,
    /// Files that did not
    pub failed: Vec<FailedFile>,
}

/// Running totals for a watch that does not end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WatchCounts {
    /// Files that produced a result document
    pub processed: u64,
    /// Files that did not
    pub failed: u64,
    /// Generators skipped across processed files
    pub skipped_generators: u64,
}

impl RunSummary {
    /// Number of generators skipped across all processed files
    pub fn skipped_generators(&self) -> usize {
        self.processed.iter().map(|o| o.skipped.len()).sum()
    }
}

/// Runtime engine for processing generation files
pub struct Runtime {
    config: Config,
    reference: ReferenceData,
}

impl Runtime {
    /// Check the configured directories and load the reference data.
    ///
    /// Fails when either directory is missing or the reference document
    /// cannot be loaded; nothing can be processed in those cases.
    pub fn new(config: Config) -> Result<Self> {
        config.validate_directories()?;

        let reference_path = config.reference_data();
        let reference = ReferenceData::load(&reference_path).with_context(|| {
            format!("Failed to load reference data from {}", reference_path.display())
        })?;

        Ok(Self::with_reference(config, reference))
    }

    /// Build a runtime around already loaded reference data
    pub fn with_reference(config: Config, reference: ReferenceData) -> Self {
        Self { config, reference }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reference factors shared by every file
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Process existing files, then watch for new ones until cancelled
    pub async fn start(&self) -> Result<()> {
        tracing::info!(
            "Watching {} (results in {})",
            self.config.input_dir().display(),
            self.config.output_dir().display()
        );

        let mut source = DirectoryWatcher::from_config(&self.config)?;
        let counts = self.watch(&mut source).await?;

        tracing::warn!(
            "Watch ended after {} files ({} failed)",
            counts.processed + counts.failed,
            counts.failed
        );
        Ok(())
    }

    /// Process the files currently in the input directory and return
    pub async fn run_once(&self) -> Result<RunSummary> {
        let mut source =
            ExistingFiles::scan(&self.config.input_dir(), &FileFilter::from_config(&self.config))?;
        tracing::info!("Processing {} existing files", source.remaining());
        self.drain(&mut source).await
    }

    /// Process every file the source yields until it is exhausted.
    /// Per-file failures are logged and recorded, never returned.
    pub async fn drain<S>(&self, source: &mut S) -> Result<RunSummary>
    where
        S: EventSource + ?Sized,
    {
        let mut summary = RunSummary::default();

        while let Some(path) = source.next_file().await? {
            match self.process_path(path).await {
                Ok(outcome) => summary.processed.push(outcome),
                Err(failed) => summary.failed.push(failed),
            }
        }

        Ok(summary)
    }

    /// Like [`drain`](Self::drain) but keeps only counters, for sources
    /// that never end
    pub async fn watch<S>(&self, source: &mut S) -> Result<WatchCounts>
    where
        S: EventSource + ?Sized,
    {
        let mut counts = WatchCounts::default();

        while let Some(path) = source.next_file().await? {
            match self.process_path(path).await {
                Ok(outcome) => {
                    counts.processed += 1;
                    counts.skipped_generators += outcome.skipped.len() as u64;
                }
                Err(_) => counts.failed += 1,
            }
        }

        Ok(counts)
    }

    async fn process_path(&self, path: PathBuf) -> std::result::Result<FileOutcome, FailedFile> {
        let job = FileJob::new(path, &self.config.output_dir());
        match process_file(&job, &self.reference).await {
            Ok(outcome) => {
                tracing::info!(
                    totals = outcome.totals,
                    max_emissions = outcome.max_emissions,
                    heat_rates = outcome.heat_rates,
                    skipped = outcome.skipped.len(),
                    "✓ {} → {}",
                    job.input.display(),
                    job.output.display()
                );
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!("✗ {}: {:#}", job.input.display(), err);
                Err(FailedFile {
                    input: job.input,
                    error: format!("{err:#}"),
                })
            }
        }
    }
}
