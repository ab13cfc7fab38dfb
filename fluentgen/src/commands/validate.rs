//! Validate command - runs the pipeline without writing anything.

use super::{build_config, load_config};
use crate::cli::{Cli, ValidateArgs};
use fluentgen_core::error::Result;
use fluentgen_core::tooling::BuilderGenerator;
use tracing::{error, info, warn};

/// Returns whether every detected type can get a builder.
pub fn run(cli: &Cli, args: &ValidateArgs) -> Result<bool> {
    info!("Validating fluentgen configuration and types");

    info!("Checking configuration...");
    let config = match load_config(cli) {
        Ok(config) => {
            info!("  Configuration file: OK");
            info!("    Output path: {}", config.output.path);
            info!(
                "    Language: {}, source: {:?}",
                config.output.language, config.source.kind
            );
            config
        }
        Err(e) => {
            error!("  Configuration file: FAILED");
            error!("    Error: {}", e);
            return Ok(false);
        }
    };
    if args.config_only {
        return Ok(true);
    }

    info!("Checking types...");
    let mut build = build_config(cli, &config);
    build.dry_run = true;
    let report = BuilderGenerator::new(build).generate_all()?;
    if report.types_processed == 0 {
        warn!("No builder targets found");
    }
    for failure in &report.failures {
        error!("  {}: FAILED", failure.type_name);
        error!("    Error: {}", failure.error);
    }
    info!(
        "  Types: {} ok, {} failed",
        report.files.len(),
        report.failures.len()
    );

    if report.is_success() {
        info!("Validation passed");
    } else {
        error!("Validation failed with errors");
    }
    Ok(report.is_success())
}
