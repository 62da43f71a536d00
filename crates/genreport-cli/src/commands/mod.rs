//! CLI command implementations

pub mod init;
pub mod process;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use genreport_core::{Config, ConfigOverrides};

/// Load the configuration file, applying command-line overrides
pub fn load_config(config_path: &str, overrides: ConfigOverrides) -> Result<Config> {
    tracing::info!("Loading configuration from {}", config_path);
    Config::load_with_overrides(config_path, overrides).context("Failed to load configuration")
}
