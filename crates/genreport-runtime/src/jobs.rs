//! File job definitions

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Suffix appended to the input base name to form the result name
pub const RESULT_SUFFIX: &str = "-Result";

/// Extension of every result document
pub const RESULT_EXTENSION: &str = "xml";

/// Job to transform a single input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileJob {
    /// Input generation document
    pub input: PathBuf,

    /// Result document to write
    pub output: PathBuf,
}

impl FileJob {
    /// Create a job writing `<input-base-name>-Result.xml` into `output_dir`
    pub fn new(input: impl Into<PathBuf>, output_dir: &Path) -> Self {
        let input = input.into();
        let output = output_dir.join(result_file_name(&input));
        Self { input, output }
    }

    /// Write the result somewhere else
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}

/// Result file name for an input path
pub fn result_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}{RESULT_SUFFIX}.{RESULT_EXTENSION}")
}

/// Whether a path already looks like a result document
pub fn is_result_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(RESULT_SUFFIX))
}
