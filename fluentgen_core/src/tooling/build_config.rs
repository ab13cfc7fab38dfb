//! Build-time configuration for builder generation.

use crate::config::{FluentgenConfig, PartialBuilderConfig, RunConfig, SourceKind};
use crate::emit::TargetLanguage;
use crate::error::Result;
use bon::Builder;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for one generation run.
///
/// ```rust,ignore
/// let config = BuildConfig::builder()
///     .scan_path("./crates")
///     .language(TargetLanguage::Kotlin)
///     .dry_run(true)
///     .build();
/// ```
#[derive(Debug, Clone, Builder)]
pub struct BuildConfig {
    /// Root path to scan for Rust types.
    #[builder(default = PathBuf::from("."), into)]
    pub scan_path: PathBuf,

    /// Output directory for generated files.
    #[builder(default = PathBuf::from("./src/generated/"), into)]
    pub output_path: PathBuf,

    /// Attribute names besides `generate_builder` that mark a target.
    #[builder(default)]
    pub marker_aliases: Vec<String>,

    #[builder(default)]
    pub language: TargetLanguage,

    #[builder(default)]
    pub source: SourceKind,

    /// Glob patterns of model files, used when `source` is `Model`.
    #[builder(default)]
    pub model_files: Vec<String>,

    #[builder(default)]
    pub run: RunConfig,

    /// Path generated Rust builders use to reach `MissingRequiredValue`.
    #[builder(default = "::fluentgen".to_string(), into)]
    pub runtime_path: String,

    /// Per-type overrides keyed by qualified name.
    #[builder(default)]
    pub types: BTreeMap<String, PartialBuilderConfig>,

    /// Render everything but write nothing.
    #[builder(default)]
    pub dry_run: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from fluentgen.toml.
    ///
    /// Searches from `CARGO_MANIFEST_DIR` (if set) or the current directory
    /// upward to the filesystem root.
    ///
    /// # Errors
    ///
    /// Returns `FluentgenError::ConfigNotFound` if no fluentgen.toml is found.
    pub fn from_toml() -> Result<Self> {
        let start_dir = env::var("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let config_path = FluentgenConfig::find_config_file(&start_dir)?;
        Self::from_toml_path(config_path)
    }

    /// Loads configuration from a specific fluentgen.toml file.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading build configuration from {:?}", path);
        Ok(Self::from_config(&FluentgenConfig::from_path(path)?))
    }

    pub fn from_config(config: &FluentgenConfig) -> Self {
        Self {
            scan_path: PathBuf::from(&config.source.scan_path),
            output_path: PathBuf::from(&config.output.path),
            marker_aliases: config.general.marker_aliases.clone(),
            language: config.output.language,
            source: config.source.kind,
            model_files: config.source.model_files.clone(),
            run: config.run.clone(),
            runtime_path: config.output.runtime_path.clone(),
            types: config.types.clone(),
            dry_run: false,
        }
    }

    /// The `[types]` entry for one target, empty when there is none.
    pub fn type_overrides(&self, qualified_name: &str) -> PartialBuilderConfig {
        self.types.get(qualified_name).cloned().unwrap_or_default()
    }
}
