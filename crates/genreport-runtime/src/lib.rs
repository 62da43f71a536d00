//! Genreport Runtime
//!
//! This crate provides the watch-folder runtime around the Genreport engine.
//!
//! # Features
//!
//! - Initial scan and live watching of the input directory
//! - One result document per input file, `<name>-Result.xml`
//! - Per-file failure isolation with a run summary
//!
//! # Usage
//!
//! ```rust,ignore
//! use genreport_runtime::Runtime;
//!
//! let runtime = Runtime::new(config)?;
//! runtime.start().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod jobs;
pub mod processor;
pub mod watcher;

pub use engine::{FailedFile, RunSummary, Runtime, WatchCounts};
pub use error::{Error, Result};
pub use jobs::FileJob;
pub use processor::{FileOutcome, process_file};
pub use watcher::{DirectoryWatcher, EventSource, ExistingFiles, FileFilter};
