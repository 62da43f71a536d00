//! Configuration parsing and validation
//!
//! This module handles loading and validating the Genreport configuration.
//!
//! # Configuration File
//!
//! `genreport.yaml` names the three locations the runtime needs:
//!
//! ```yaml
//! name: plant-reports
//! input_dir: ./data/input
//! output_dir: ./data/output
//! reference_data: ./data/ReferenceData.xml
//! watch:
//!   extension: xml
//!   settle_delay_ms: 250
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
//! Command-line overrides replace individual paths after loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "genreport.yaml";

/// Project configuration from `genreport.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    #[serde(default = "default_name")]
    pub name: String,

    /// Directory watched for incoming generation files
    pub input_dir: PathBuf,

    /// Directory result documents are written to
    pub output_dir: PathBuf,

    /// Reference data document with the factor tables
    pub reference_data: PathBuf,

    /// Watch loop settings
    #[serde(default)]
    pub watch: WatchConfig,
}

fn default_name() -> String {
    "genreport".to_string()
}

/// Watch loop settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchConfig {
    /// File extension (without the dot) of files to process
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Pause between a file appearing and reading it, in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

fn default_extension() -> String {
    "xml".to_string()
}

fn default_settle_delay_ms() -> u64 {
    250
}

/// Path overrides, typically from command-line flags or the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces `input_dir`
    pub input_dir: Option<PathBuf>,
    /// Replaces `output_dir`
    pub output_dir: Option<PathBuf>,
    /// Replaces `reference_data`
    pub reference_data: Option<PathBuf>,
}

impl ConfigOverrides {
    fn is_complete(&self) -> bool {
        self.input_dir.is_some() && self.output_dir.is_some() && self.reference_data.is_some()
    }
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Directory relative paths are resolved against
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a directory or file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the project directory or genreport.yaml file
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./plant")?;
    /// println!("Watching {}", config.input_dir().display());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let project: ProjectConfig = serde_yaml::from_str(&contents)?;

        let config = Self { project, base_path };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration and apply overrides.
    ///
    /// When no configuration file exists, overrides for all three paths are
    /// enough to build a configuration on their own.
    pub fn load_with_overrides<P: AsRef<Path>>(path: P, overrides: ConfigOverrides) -> Result<Self> {
        let config = match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(Error::ConfigNotFound { .. }) if overrides.is_complete() => {
                tracing::debug!("No configuration file; using path overrides only");
                Self::from_paths(".", ".", ".")
            }
            Err(err) => return Err(err),
        };
        config.with_overrides(overrides)
    }

    /// Build a configuration directly from the three paths
    pub fn from_paths(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        reference_data: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project: ProjectConfig {
                name: default_name(),
                input_dir: input_dir.into(),
                output_dir: output_dir.into(),
                reference_data: reference_data.into(),
                watch: WatchConfig::default(),
            },
            base_path: PathBuf::from("."),
        }
    }

    /// Replace paths with overrides, made absolute against the current
    /// working directory
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(path) = overrides.input_dir {
            self.project.input_dir = std::path::absolute(path)?;
        }
        if let Some(path) = overrides.output_dir {
            self.project.output_dir = std::path::absolute(path)?;
        }
        if let Some(path) = overrides.reference_data {
            self.project.reference_data = std::path::absolute(path)?;
        }
        Ok(self)
    }

    /// Resolved input directory
    pub fn input_dir(&self) -> PathBuf {
        self.resolve(&self.project.input_dir)
    }

    /// Resolved output directory
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.project.output_dir)
    }

    /// Resolved reference data path
    pub fn reference_data(&self) -> PathBuf {
        self.resolve(&self.project.reference_data)
    }

    /// Extension of processed files, without a leading dot
    pub fn extension(&self) -> &str {
        self.project.watch.extension.trim_start_matches('.')
    }

    /// Fail unless both the input and output directories exist
    pub fn validate_directories(&self) -> Result<()> {
        for (label, dir) in [("input", self.input_dir()), ("output", self.output_dir())] {
            if !dir.is_dir() {
                return Err(Error::ConfigInvalid {
                    message: format!("{} directory does not exist: {}", label, dir.display()),
                });
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.extension().is_empty() {
            return Err(Error::ConfigInvalid {
                message: "watch.extension must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
input_dir: in
output_dir: out
reference_data: ref.xml
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "genreport");
        assert_eq!(config.watch, WatchConfig::default());
        assert_eq!(config.watch.extension, "xml");
        assert_eq!(config.watch.settle_delay_ms, 250);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
name: plant
input_dir: /data/in
output_dir: /data/out
reference_data: /data/ReferenceData.xml
watch:
  extension: ".XML"
  settle_delay_ms: 0
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "plant");
        assert_eq!(config.watch.settle_delay_ms, 0);

        let config = Config {
            project: config,
            base_path: PathBuf::from("/ignored"),
        };
        assert_eq!(config.extension(), "XML");
        assert_eq!(config.input_dir(), PathBuf::from("/data/in"));
    }

    #[test]
    fn test_missing_required_path_is_parse_error() {
        let result: std::result::Result<ProjectConfig, _> =
            serde_yaml::from_str("input_dir: in\noutput_dir: out\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "input_dir: in\noutput_dir: out\nreference_data: data/ref.xml\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.input_dir(), dir.path().join("in"));
        assert_eq!(config.reference_data(), dir.path().join("data/ref.xml"));

        let by_file = Config::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(by_file.output_dir(), dir.path().join("out"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_empty_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "input_dir: in\noutput_dir: out\nreference_data: r.xml\nwatch:\n  extension: \".\"\n",
        )
        .unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "input_dir: in\noutput_dir: out\nreference_data: r.xml\n",
        )
        .unwrap();
        let elsewhere = tempfile::tempdir().unwrap();

        let config = Config::load_with_overrides(
            dir.path(),
            ConfigOverrides {
                output_dir: Some(elsewhere.path().to_path_buf()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.input_dir(), dir.path().join("in"));
        assert_eq!(config.output_dir(), elsewhere.path());
    }

    #[test]
    fn test_complete_overrides_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = ConfigOverrides {
            input_dir: Some(dir.path().join("in")),
            output_dir: Some(dir.path().join("out")),
            reference_data: Some(dir.path().join("r.xml")),
        };

        let config = Config::load_with_overrides(dir.path(), overrides).unwrap();
        assert_eq!(config.input_dir(), dir.path().join("in"));
        assert_eq!(config.reference_data(), dir.path().join("r.xml"));
    }

    #[test]
    fn test_partial_overrides_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = ConfigOverrides {
            input_dir: Some(dir.path().join("in")),
            ..Default::default()
        };

        let err = Config::load_with_overrides(dir.path(), overrides).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_validate_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("in")).unwrap();
        let config = Config::from_paths(
            dir.path().join("in"),
            dir.path().join("out"),
            dir.path().join("r.xml"),
        );

        let err = config.validate_directories().unwrap_err();
        assert!(err.to_string().contains("output directory does not exist"));

        std::fs::create_dir(dir.path().join("out")).unwrap();
        config.validate_directories().unwrap();
    }
}
