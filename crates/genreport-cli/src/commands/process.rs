//! Transform a single file

use anyhow::{Context, Result};
use std::path::Path;

use genreport_core::{ConfigOverrides, ReferenceData};

/// Run the process command.
///
/// Reference data comes from `--reference-data` when given, otherwise from
/// the configuration file.
pub async fn run(
    config_path: &str,
    overrides: ConfigOverrides,
    input: &Path,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let reference_path = match overrides.reference_data.clone() {
        Some(path) => path,
        None => super::load_config(config_path, overrides)?.reference_data(),
    };
    let reference = ReferenceData::load(&reference_path)
        .with_context(|| format!("Failed to load reference data from {}", reference_path.display()))?;

    let contents = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let (report, rendered) = genreport_core::generate(&contents, &reference)
        .with_context(|| format!("Failed to transform {}", input.display()))?;

    for skipped in &report.skipped {
        tracing::warn!(
            "Skipped {} generator {}: {}",
            skipped.kind,
            skipped.name.as_deref().unwrap_or("<unnamed>"),
            skipped.reason
        );
    }

    if let Some(path) = output {
        tokio::fs::write(path, &rendered)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("✓ Wrote {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if output.is_none() {
        print!("{rendered}");
    }

    Ok(())
}
