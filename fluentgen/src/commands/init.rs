//! Init command - writes a starter fluentgen.toml.

use crate::cli::{Cli, InitArgs};
use fluentgen_core::config::CONFIG_FILE_NAME;
use fluentgen_core::error::{FluentgenError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const STARTER_CONFIG: &str = r#"# fluentgen configuration
# See https://github.com/rymskip/fluentgen for documentation

[general]
# Attribute names besides `generate_builder` that mark a struct for generation.
# Structs using #[derive(Builder)] get their builder from the macro instead.
marker_aliases = []

[run]
line_separator = "\n"
builder_suffix = "Builder"

[output]
# Output directory for generated builders
path = "./src/generated/"
# "rust" or "kotlin"
language = "rust"
# Crate generated Rust builders take MissingRequiredValue from
runtime_path = "::fluentgen"

[source]
# "rust" scans source files, "model" reads JSON/TOML model files
kind = "rust"
scan_path = "."
model_files = []

# Per-type overrides, keyed by qualified name
# [types."crate::shapes::Point"]
# class_name = "PointMaker"
# prefix = "with"
# optimize_copy = false
"#;

/// Runs the init command.
pub fn run(cli: &Cli, args: &InitArgs) -> Result<()> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    write_config(&path, args.force)?;

    info!("Created {}", path.display());
    info!("Next steps:");
    info!("  1. Edit {} to configure your project", path.display());
    info!("  2. Mark your Rust structs with #[fluentgen::generate_builder]");
    info!("  3. Run 'fluentgen generate' to write the builders");
    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(FluentgenError::config(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }
    fs::write(path, STARTER_CONFIG)?;
    Ok(())
}
