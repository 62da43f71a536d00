//! File-ready event sources
//!
//! The runtime consumes input paths one at a time from an [`EventSource`].
//! [`ExistingFiles`] yields whatever is in the input directory and then ends;
//! [`DirectoryWatcher`] does the same and then keeps yielding files as they
//! are created. Creating a new source restarts the sequence from a fresh scan.

use anyhow::{Context, Result};
use async_trait::async_trait;
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use genreport_core::Config;

use crate::jobs::is_result_file;

/// Producer of input files that are ready to process
#[async_trait]
pub trait EventSource: Send {
    /// Next ready file, or `None` once the source is exhausted
    async fn next_file(&mut self) -> Result<Option<PathBuf>>;
}

/// Decides which paths in the input directory are inputs
#[derive(Debug, Clone)]
pub struct FileFilter {
    extension: String,
    skip_results: bool,
}

impl FileFilter {
    /// Accept files with the given extension (case-insensitive)
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into().trim_start_matches('.').to_string(),
            skip_results: false,
        }
    }

    /// Also reject `*-Result.*` files
    pub fn skip_results(mut self, skip: bool) -> Self {
        self.skip_results = skip;
        self
    }

    /// Filter for a configuration. Result files are rejected when results
    /// are written back into the input directory.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.extension())
            .skip_results(same_directory(&config.input_dir(), &config.output_dir()))
    }

    /// Whether the path should be processed
    pub fn accepts(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension));
        extension_matches && !(self.skip_results && is_result_file(path))
    }
}

/// Whether two spellings name the same directory. Falls back to comparing
/// the paths as written when either cannot be resolved.
fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Accepted files directly inside `dir`, sorted by path
pub fn scan_directory(dir: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        if entry.file_type().is_file() && filter.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// One-shot source over the files present when it was created
#[derive(Debug, Default)]
pub struct ExistingFiles {
    pending: VecDeque<PathBuf>,
}

impl ExistingFiles {
    /// Scan `dir` once
    pub fn scan(dir: &Path, filter: &FileFilter) -> Result<Self> {
        Ok(Self {
            pending: scan_directory(dir, filter)?.into(),
        })
    }

    /// Number of files not yet yielded
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl EventSource for ExistingFiles {
    async fn next_file(&mut self) -> Result<Option<PathBuf>> {
        Ok(self.pending.pop_front())
    }
}

/// Initial scan followed by live create notifications
pub struct DirectoryWatcher {
    initial: VecDeque<PathBuf>,
    already_seen: HashSet<PathBuf>,
    ready: VecDeque<PathBuf>,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    filter: FileFilter,
    settle_delay: Duration,
    // Dropping the watcher stops notifications
    _watcher: RecommendedWatcher,
}

impl DirectoryWatcher {
    /// Start watching `dir`.
    ///
    /// The watch is registered before the initial scan so nothing created
    /// in between is missed; paths reported by both are yielded once.
    pub fn start(dir: &Path, filter: FileFilter, settle_delay: Duration) -> Result<Self> {
        let (tx, events) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            // Receiver gone means the source was dropped
            let _ = tx.send(event);
        })
        .context("Failed to create filesystem watcher")?;
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        let initial = scan_directory(dir, &filter)?;
        tracing::debug!(
            "Watching {} ({} existing files)",
            dir.display(),
            initial.len()
        );

        Ok(Self {
            already_seen: initial.iter().cloned().collect(),
            initial: initial.into(),
            ready: VecDeque::new(),
            events,
            filter,
            settle_delay,
            _watcher: watcher,
        })
    }

    /// Start watching the configured input directory
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::start(
            &config.input_dir(),
            FileFilter::from_config(config),
            Duration::from_millis(config.project.watch.settle_delay_ms),
        )
    }

    fn enqueue(&mut self, event: Event) {
        for path in created_paths(event) {
            if self.already_seen.remove(&path) {
                continue;
            }
            if self.filter.accepts(&path) && !self.ready.contains(&path) {
                tracing::debug!("New file {}", path.display());
                self.ready.push_back(path);
            }
        }
    }
}

#[async_trait]
impl EventSource for DirectoryWatcher {
    async fn next_file(&mut self) -> Result<Option<PathBuf>> {
        if let Some(path) = self.initial.pop_front() {
            return Ok(Some(path));
        }

        loop {
            if let Some(path) = self.ready.pop_front() {
                if !self.settle_delay.is_zero() {
                    tokio::time::sleep(self.settle_delay).await;
                }
                return Ok(Some(path));
            }

            match self.events.recv().await {
                Some(Ok(event)) => self.enqueue(event),
                Some(Err(err)) => tracing::warn!("Filesystem watch error: {}", err),
                None => return Ok(None),
            }
        }
    }
}

/// Paths that became present in the directory through this event
fn created_paths(event: Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(CreateKind::File | CreateKind::Any) => event.paths,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.into_iter().last().into_iter().collect()
        }
        _ => Vec::new(),
    }
}
