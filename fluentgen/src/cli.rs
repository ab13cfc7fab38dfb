//! Command-line interface definitions for fluentgen.

use clap::{Args, Parser, Subcommand, ValueEnum};
use fluentgen_core::config::SourceKind;
use fluentgen_core::emit::TargetLanguage;
use std::path::PathBuf;

/// fluentgen - fluent builder generation for value types
#[derive(Parser, Debug)]
#[command(name = "fluentgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to fluentgen.toml configuration file
    #[arg(short, long, global = true, env = "FLUENTGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output path override (overrides config file)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one builder source file per target type
    Generate(GenerateArgs),

    /// Run the pipeline without writing and report per-type errors
    Validate(ValidateArgs),

    /// Display detected types and the builders they would get
    Info(InfoArgs),

    /// Initialize a new fluentgen.toml configuration file
    Init(InitArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    Rust,
    Kotlin,
}

impl From<LanguageArg> for TargetLanguage {
    fn from(language: LanguageArg) -> Self {
        match language {
            LanguageArg::Rust => TargetLanguage::Rust,
            LanguageArg::Kotlin => TargetLanguage::Kotlin,
        }
    }
}

/// Source of truth for type definitions
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Rust structs marked with #[generate_builder]
    Rust,
    /// JSON or TOML model files
    Model,
}

impl From<SourceArg> for SourceKind {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Rust => SourceKind::Rust,
            SourceArg::Model => SourceKind::Model,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Output language (overrides config)
    #[arg(long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Where target types are read from (overrides config)
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// Render builders without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Validate configuration file only
    #[arg(long)]
    pub config_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: InfoFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InfoFormat {
    Pretty,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing fluentgen.toml if present
    #[arg(short, long)]
    pub force: bool,
}
