//! Run the Genreport watch loop

use anyhow::{Context, Result};
use genreport_core::ConfigOverrides;
use genreport_runtime::Runtime;

/// Run the watch loop, or a single pass with `once`
pub async fn run(config_path: &str, overrides: ConfigOverrides, once: bool) -> Result<()> {
    let config = super::load_config(config_path, overrides)?;

    tracing::info!("Project: {}", config.project.name);

    let runtime = Runtime::new(config).context("Failed to start runtime")?;

    if once {
        let summary = runtime.run_once().await?;
        tracing::info!(
            "Processed {} files ({} failed, {} generators skipped)",
            summary.processed.len(),
            summary.failed.len(),
            summary.skipped_generators()
        );
        return Ok(());
    }

    tracing::info!("Starting runtime (press Ctrl+C to stop)");

    tokio::select! {
        result = runtime.start() => {
            result.context("Runtime error")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            tracing::info!("Received shutdown signal");
        }
    }

    tracing::info!("Genreport stopped");
    Ok(())
}
