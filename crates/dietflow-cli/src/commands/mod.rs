//! CLI command implementations

use anyhow::{Context, Result};
use dietflow_core::config::CONFIG_FILE_NAME;
use dietflow_core::{Config, OutputFormat};
use std::path::PathBuf;

pub mod init;
pub mod run;
pub mod validate;

/// Command-line replacements for configured settings
#[derive(Debug, Default)]
pub struct Overrides {
    /// Dataset path
    pub input: Option<PathBuf>,
    /// Artifact path
    pub output: Option<PathBuf>,
    /// Artifact format
    pub format: Option<OutputFormat>,
}

/// Load the configuration and apply overrides.
///
/// An explicit `--config` must exist; the default location falls back to
/// built-in settings. Override paths are relative to the working directory.
pub fn load_config(config_path: Option<&str>, overrides: Overrides) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            Config::load(path).context("Failed to load configuration")?
        }
        None => Config::load_or_default(CONFIG_FILE_NAME)
            .context("Failed to load configuration")?,
    };

    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    if let Some(input) = overrides.input {
        config.set_input_path(cwd.join(input));
    }
    if let Some(output) = overrides.output {
        config.set_output_path(cwd.join(output));
    }
    if let Some(format) = overrides.format {
        config.set_output_format(format);
    }
    Ok(config)
}
