//! Batch generation of builder files from a `build.rs` or the CLI.
//!
//! [`WorkspaceScanner`] finds Rust sources, [`BuilderGenerator`] pushes each
//! described type through extraction, synthesis and emission, and
//! [`BuildConfig`] holds the knobs for both.
//!
//! ```rust,ignore
//! // build.rs
//! fn main() {
//!     let report = fluentgen_core::tooling::generate().expect("builder generation");
//!     if !report.is_success() {
//!         println!("cargo:warning={report}");
//!     }
//!     println!("cargo:rerun-if-changed=src/");
//!     println!("cargo:rerun-if-changed=fluentgen.toml");
//! }
//! ```

mod build_config;
mod generator;
mod workspace_scanner;

pub use build_config::*;
pub use generator::*;
pub use workspace_scanner::*;

use crate::error::Result;

/// Runs one generation pass configured by the nearest `fluentgen.toml`.
///
/// The file is looked up starting at `CARGO_MANIFEST_DIR`. Only I/O and
/// configuration problems are returned as errors; a type that cannot get a
/// builder ends up in [`GenerationReport::failures`] instead.
pub fn generate() -> Result<GenerationReport> {
    generate_with_config(BuildConfig::from_toml()?)
}

pub fn generate_with_config(config: BuildConfig) -> Result<GenerationReport> {
    BuilderGenerator::new(config).generate_all()
}
