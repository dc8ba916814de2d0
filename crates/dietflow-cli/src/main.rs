//! Dietflow CLI
//!
//! Builds the sex → age group → diet → environmental impact Sankey diagram
//! from a dietary-impact results file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dietflow_core::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Dietflow - diet impact flow diagrams
#[derive(Parser)]
#[command(name = "dietflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./dietflow.yaml, or built-in settings if absent)
    #[arg(short, long, env = "DIETFLOW_CONFIG")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new dietflow project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Build the diagram and write the artifact (the default)
    Run {
        /// Dataset to read instead of the configured one
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Artifact destination instead of the configured one
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Artifact format (html or json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Run the pipeline without writing anything and report what it found
    Validate {
        /// Dataset to read instead of the configured one
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Some(Commands::Init { path, name }) => {
            commands::init::run(&path, name.as_deref())?;
        }
        Some(Commands::Run {
            input,
            output,
            format,
        }) => {
            commands::run::run(
                config,
                commands::Overrides {
                    input,
                    output,
                    format,
                },
            )?;
        }
        None => {
            commands::run::run(config, commands::Overrides::default())?;
        }
        Some(Commands::Validate { input, json }) => {
            commands::validate::run(
                config,
                commands::Overrides {
                    input,
                    ..Default::default()
                },
                json,
            )?;
        }
    }

    Ok(())
}
