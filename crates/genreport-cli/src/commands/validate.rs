//! Validate configuration command

use anyhow::{Context, Result};
use genreport_core::{ConfigOverrides, ReferenceData};

/// Run the validate command
pub async fn run(config_path: &str, overrides: ConfigOverrides) -> Result<()> {
    tracing::info!("Validating configuration: {}", config_path);

    let config = super::load_config(config_path, overrides)?;

    tracing::info!("✓ Project: {}", config.project.name);

    config
        .validate_directories()
        .context("Directory check failed")?;
    tracing::info!("✓ Input directory: {}", config.input_dir().display());
    tracing::info!("✓ Output directory: {}", config.output_dir().display());

    let reference_path = config.reference_data();
    let reference = ReferenceData::load(&reference_path)
        .with_context(|| format!("Failed to load {}", reference_path.display()))?;
    tracing::info!("✓ Reference data: {}", reference_path.display());

    for table in [&reference.value_factors, &reference.emission_factors] {
        let entries: Vec<_> = table.iter().map(|(k, v)| format!("{k}={v}")).collect();
        tracing::info!("  {} factors: {}", table.kind(), entries.join(", "));
    }

    tracing::info!("✓ Configuration is valid");
    Ok(())
}
