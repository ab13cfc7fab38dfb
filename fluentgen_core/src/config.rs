use crate::emit::TargetLanguage;
use crate::error::{ExtractionError, FluentgenError, Result};
use crate::model::TargetTypeModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, trace, warn};

pub const CONFIG_FILE_NAME: &str = "fluentgen.toml";
pub const DEFAULT_BUILDER_SUFFIX: &str = "Builder";

/// Per-type builder options, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct BuilderConfig {
    /// Explicit builder class name, overriding `simple_name + suffix`.
    pub custom_class_name: Option<String>,
    /// Setter prefix such as `with` or `set`; empty means none.
    pub setter_prefix: String,
    /// Reuse one shared default instance for defaults-only targets.
    pub optimize_copy: bool,
}

impl BuilderConfig {
    /// The builder's simple class name for the given target.
    ///
    /// Enclosing type names are prepended so nested targets that share a
    /// simple name do not collide at package level.
    pub fn builder_class_name(&self, model: &TargetTypeModel, run: &RunConfig) -> String {
        match &self.custom_class_name {
            Some(name) => name.clone(),
            None => format!(
                "{}{}{}",
                model.enclosing.concat(),
                model.simple_name,
                run.builder_suffix
            ),
        }
    }
}

/// Builder options as declared by one configuration source.
///
/// Unset options are `None`, so two sources can be layered and checked for
/// contradictions before being resolved into a [`BuilderConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PartialBuilderConfig {
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimize_copy: Option<bool>,
}

impl PartialBuilderConfig {
    /// Layers `other` on top of `self`.
    ///
    /// An option explicitly set by both sources to different values is a
    /// [`ExtractionError::DuplicateConfiguration`].
    pub fn merge(
        self,
        other: PartialBuilderConfig,
        type_name: &str,
    ) -> std::result::Result<Self, ExtractionError> {
        trace!(type_name, "Merging builder configuration sources");
        Ok(Self {
            class_name: merge_option(type_name, "class_name", self.class_name, other.class_name)?,
            prefix: merge_option(type_name, "prefix", self.prefix, other.prefix)?,
            optimize_copy: merge_option(
                type_name,
                "optimize_copy",
                self.optimize_copy,
                other.optimize_copy,
            )?,
        })
    }

    pub fn resolve(self) -> BuilderConfig {
        BuilderConfig {
            custom_class_name: self.class_name.filter(|name| !name.is_empty()),
            setter_prefix: self.prefix.unwrap_or_default(),
            optimize_copy: self.optimize_copy.unwrap_or(false),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.class_name.is_none() && self.prefix.is_none() && self.optimize_copy.is_none()
    }
}

fn merge_option<T: PartialEq + ToString>(
    type_name: &str,
    option: &str,
    first: Option<T>,
    second: Option<T>,
) -> std::result::Result<Option<T>, ExtractionError> {
    match (first, second) {
        (Some(a), Some(b)) if a != b => {
            warn!(type_name, option, "Conflicting builder configuration");
            Err(ExtractionError::duplicate_configuration(
                type_name,
                option,
                a.to_string(),
                b.to_string(),
            ))
        }
        (Some(a), _) => Ok(Some(a)),
        (None, b) => Ok(b),
    }
}

/// Run-wide options shared by every builder of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_line_separator")]
    pub line_separator: String,
    #[serde(default = "default_builder_suffix")]
    pub builder_suffix: String,
}

fn default_line_separator() -> String {
    "\n".to_string()
}

fn default_builder_suffix() -> String {
    DEFAULT_BUILDER_SUFFIX.to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            line_separator: default_line_separator(),
            builder_suffix: default_builder_suffix(),
        }
    }
}

/// General configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GeneralConfig {
    /// Attribute names besides `generate_builder` that mark a struct for
    /// batch generation
    #[serde(default)]
    pub marker_aliases: Vec<String>,
}

/// Where generated builders go and in which language
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default)]
    pub language: TargetLanguage,
    /// Path of the crate providing `MissingRequiredValue` to generated Rust code
    #[serde(default = "default_runtime_path")]
    pub runtime_path: String,
}

fn default_output_path() -> String {
    "./src/generated/".to_string()
}

fn default_runtime_path() -> String {
    "::fluentgen".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            language: TargetLanguage::default(),
            runtime_path: default_runtime_path(),
        }
    }
}

/// Source of truth for target type descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Rust structs marked with #[generate_builder]
    #[default]
    Rust,
    /// JSON/TOML model files produced by an external reflector
    Model,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    /// Root directory scanned for Rust sources
    #[serde(default = "default_scan_path")]
    pub scan_path: String,
    /// Glob patterns for model files (e.g., "./models/*.json")
    #[serde(default)]
    pub model_files: Vec<String>,
}

fn default_scan_path() -> String {
    ".".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            scan_path: default_scan_path(),
            model_files: Vec::new(),
        }
    }
}

/// Root configuration loaded from `fluentgen.toml`
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FluentgenConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub source: SourceConfig,
    /// Per-type overrides keyed by qualified name
    #[serde(default)]
    pub types: BTreeMap<String, PartialBuilderConfig>,
}

impl FluentgenConfig {
    /// Load configuration by searching for fluentgen.toml in the current
    /// directory and its ancestors.
    pub fn new() -> Result<FluentgenConfig> {
        info!("Loading fluentgen configuration");
        dotenv::dotenv().ok();
        debug!("Environment variables loaded from .env if present");

        let config_path = Self::find_config_file(&env::current_dir()?)?;
        info!("Found configuration file at: {:?}", config_path);
        Self::from_path(&config_path)
    }

    /// Load configuration from an explicit file.
    ///
    /// Relative output and scan paths are resolved against the file's
    /// directory.
    pub fn from_path(config_path: &Path) -> Result<FluentgenConfig> {
        let contents = fs::read_to_string(config_path).map_err(|e| {
            error!("Failed to read configuration file: {}", e);
            FluentgenError::from(e)
        })?;
        debug!("Configuration file size: {} bytes", contents.len());

        let mut config = Self::parse(&contents)?;
        if let Some(base_dir) = config_path.parent() {
            config.output.path = resolve_relative(base_dir, &config.output.path);
            config.source.scan_path = resolve_relative(base_dir, &config.source.scan_path);
            config.source.model_files = config
                .source
                .model_files
                .iter()
                .map(|pattern| resolve_relative(base_dir, pattern))
                .collect();
        }
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse configuration text and substitute environment variables in
    /// path values.
    pub fn parse(contents: &str) -> Result<FluentgenConfig> {
        let mut config: FluentgenConfig = toml::from_str(contents).map_err(|e| {
            error!("Failed to parse TOML configuration: {}", e);
            FluentgenError::config(e.to_string())
        })?;
        debug!("Successfully parsed TOML configuration");

        config.output.path = Self::substitute_env_vars(&config.output.path)?;
        config.source.scan_path = Self::substitute_env_vars(&config.source.scan_path)?;
        config.source.model_files = config
            .source
            .model_files
            .iter()
            .map(|pattern| Self::substitute_env_vars(pattern))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Output language: {}, source: {:?}, {} per-type overrides",
            config.output.language,
            config.source.kind,
            config.types.len()
        );
        Ok(config)
    }

    /// The configuration file entry for one target, if any.
    pub fn type_overrides(&self, qualified_name: &str) -> PartialBuilderConfig {
        self.types.get(qualified_name).cloned().unwrap_or_default()
    }

    /// Searches for `fluentgen.toml` starting from `start_dir` and
    /// traversing up to the root.
    pub fn find_config_file(start_dir: &Path) -> Result<PathBuf> {
        debug!("Starting config file search from: {:?}", start_dir);

        for path in start_dir.ancestors() {
            let config_path = path.join(CONFIG_FILE_NAME);
            trace!("Checking for config at: {:?}", config_path);
            if config_path.exists() {
                return Ok(config_path);
            }
        }

        error!("Configuration file 'fluentgen.toml' not found in any parent directory.");
        Err(FluentgenError::ConfigNotFound {
            search_start: start_dir.to_path_buf(),
        })
    }

    /// Substitute environment variables in config strings
    /// Supports ${VAR_NAME:-default} syntax
    fn substitute_env_vars(value: &str) -> Result<String> {
        trace!("Substituting environment variables in: {}", value);
        let mut result = value.to_string();

        let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}")?;

        for cap in re.captures_iter(value) {
            let var_name = &cap[1];
            let default_value = cap.get(2).map(|m| m.as_str());

            let replacement = match env::var(var_name) {
                Ok(val) => {
                    debug!("Resolved environment variable: {}", var_name);
                    val
                }
                Err(_) => match default_value {
                    Some(default) => {
                        warn!(
                            "Environment variable {} not set, using default: {}",
                            var_name, default
                        );
                        default.to_string()
                    }
                    None => {
                        error!(
                            "Environment variable {} not set and no default provided",
                            var_name
                        );
                        return Err(FluentgenError::EnvVarNotSet(var_name.to_string()));
                    }
                },
            };

            result = result.replace(&cap[0], &replacement);
        }

        Ok(result)
    }
}

fn resolve_relative(base_dir: &Path, value: &str) -> String {
    let path = Path::new(value);
    if path.is_absolute() {
        value.to_string()
    } else {
        base_dir.join(path).to_string_lossy().into_owned()
    }
}
