//! Genreport CLI
//!
//! Watches a folder of generation reports and writes derived result documents.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use genreport_core::ConfigOverrides;

mod commands;

/// Genreport - generation report transformer
#[derive(Parser)]
#[command(name = "genreport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "genreport.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Input directory (overrides the configuration file)
    #[arg(long, env = "GENREPORT_INPUT_DIR", global = true)]
    input_dir: Option<PathBuf>,

    /// Output directory (overrides the configuration file)
    #[arg(long, env = "GENREPORT_OUTPUT_DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Reference data document (overrides the configuration file)
    #[arg(long, env = "GENREPORT_REFERENCE_DATA", global = true)]
    reference_data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Genreport project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Process existing files and watch for new ones
    Run {
        /// Process the files already present and exit
        #[arg(long)]
        once: bool,
    },

    /// Validate configuration and reference data without processing
    Validate,

    /// Transform a single file
    Process {
        /// Input generation report
        input: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the derived report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }

    let overrides = ConfigOverrides {
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
        reference_data: cli.reference_data,
    };

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref()).await?;
        }
        Commands::Run { once } => {
            commands::run::run(&cli.config, overrides, once).await?;
        }
        Commands::Validate => {
            commands::validate::run(&cli.config, overrides).await?;
        }
        Commands::Process {
            input,
            output,
            json,
        } => {
            commands::process::run(&cli.config, overrides, &input, output.as_deref(), json)
                .await?;
        }
    }

    Ok(())
}
