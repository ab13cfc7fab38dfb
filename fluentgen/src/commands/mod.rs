//! Command handlers for the fluentgen CLI.

pub mod generate;
pub mod info;
pub mod init;
pub mod validate;

use crate::cli::Cli;
use fluentgen_core::config::FluentgenConfig;
use fluentgen_core::error::Result;
use fluentgen_core::tooling::BuildConfig;
use tracing::{error, info};

/// Loads `--config` if given, otherwise searches upward for fluentgen.toml.
pub fn load_config(cli: &Cli) -> Result<FluentgenConfig> {
    let config = match &cli.config {
        Some(path) => FluentgenConfig::from_path(path),
        None => FluentgenConfig::new(),
    };
    match config {
        Ok(config) => {
            info!("Configuration loaded successfully");
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Build configuration with the global CLI overrides applied.
pub fn build_config(cli: &Cli, config: &FluentgenConfig) -> BuildConfig {
    let mut build = BuildConfig::from_config(config);
    if let Some(output) = &cli.output {
        build.output_path = output.clone();
    }
    build
}
