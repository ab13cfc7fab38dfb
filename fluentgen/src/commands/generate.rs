//! Generate command - writes one builder per target type.

use super::{build_config, load_config};
use crate::cli::{Cli, GenerateArgs};
use fluentgen_core::error::Result;
use fluentgen_core::tooling::{BuilderGenerator, GenerationReport};
use tracing::{debug, error, info};

/// Runs the generate command with default arguments.
pub fn run_default(cli: &Cli) -> Result<GenerationReport> {
    run(cli, &GenerateArgs::default())
}

pub fn run(cli: &Cli, args: &GenerateArgs) -> Result<GenerationReport> {
    info!("Starting fluentgen builder generation");
    let config = load_config(cli)?;

    let mut build = build_config(cli, &config);
    if let Some(language) = args.language {
        build.language = language.into();
    }
    if let Some(source) = args.source {
        build.source = source.into();
    }
    build.dry_run = args.dry_run;
    debug!(
        "Generating {} builders from {:?} sources into {:?}",
        build.language, build.source, build.output_path
    );

    let report = BuilderGenerator::new(build).generate_all()?;
    for file in &report.files {
        debug!(
            "  {} -> {:?} ({} bytes)",
            file.builder, file.path, file.bytes_written
        );
    }
    for failure in &report.failures {
        match &failure.origin {
            Some(origin) => error!("{} ({:?}): {}", failure.type_name, origin, failure.error),
            None => error!("{}: {}", failure.type_name, failure.error),
        }
    }
    info!(
        "Generated {} builders for {} types",
        report.files.len(),
        report.types_processed
    );
    Ok(report)
}
