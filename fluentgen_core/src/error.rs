use std::path::PathBuf;
use thiserror::Error;

/// Per-type failures of the extraction phase.
///
/// These are values, not aborts: the orchestrating layer reports them and
/// carries on with the next target type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Cannot generate a builder for {type_name}: {reason}")]
    NotABuildableType { type_name: String, reason: String },

    #[error("Unresolvable bound `{bound}` on type parameter {parameter} of {type_name}")]
    UnresolvableBound {
        type_name: String,
        parameter: String,
        bound: String,
    },

    #[error(
        "Conflicting configuration for {type_name}: option `{option}` is set to `{first}` and `{second}`"
    )]
    DuplicateConfiguration {
        type_name: String,
        option: String,
        first: String,
        second: String,
    },

    #[error("Duplicate identifier `{identifier}` in builder for {type_name}: {context}")]
    DuplicateIdentifier {
        type_name: String,
        identifier: String,
        context: String,
    },
}

impl ExtractionError {
    pub fn not_buildable(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ExtractionError::NotABuildableType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn unresolvable_bound(
        type_name: impl Into<String>,
        parameter: impl Into<String>,
        bound: impl Into<String>,
    ) -> Self {
        ExtractionError::UnresolvableBound {
            type_name: type_name.into(),
            parameter: parameter.into(),
            bound: bound.into(),
        }
    }

    pub fn duplicate_configuration(
        type_name: impl Into<String>,
        option: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        ExtractionError::DuplicateConfiguration {
            type_name: type_name.into(),
            option: option.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn duplicate_identifier(
        type_name: impl Into<String>,
        identifier: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        ExtractionError::DuplicateIdentifier {
            type_name: type_name.into(),
            identifier: identifier.into(),
            context: context.into(),
        }
    }

    /// Name of the target type the error was raised for.
    pub fn type_name(&self) -> &str {
        match self {
            ExtractionError::NotABuildableType { type_name, .. }
            | ExtractionError::UnresolvableBound { type_name, .. }
            | ExtractionError::DuplicateConfiguration { type_name, .. }
            | ExtractionError::DuplicateIdentifier { type_name, .. } => type_name,
        }
    }
}

/// Failures while rendering a builder description to source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("Type `{ty}` cannot be expressed in {language}")]
    UnsupportedType { ty: String, language: String },

    #[error("`{name}` is not a valid {language} identifier")]
    InvalidIdentifier { name: String, language: String },

    #[error(
        "Builder {builder} shares a default instance but its target is generic; disable optimize_copy"
    )]
    GenericSharedInstance { builder: String },

    #[error("Builder {builder} cannot declare `{name}` in {language}: {context}")]
    MemberClash {
        builder: String,
        name: String,
        language: String,
        context: String,
    },

    #[error("Invalid default expression for property {property}: {message}")]
    InvalidDefaultExpression { property: String, message: String },

    #[error("Failed to render {builder}: {message}")]
    Render { builder: String, message: String },
}

/// Raised by generated builders when `build()` is called before a
/// non-nullable required property was set.
///
/// The property is always the first unset one in declaration order.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("Property {property} is mandatory and must be set in builder")]
pub struct MissingRequiredValue {
    pub property: &'static str,
}

impl MissingRequiredValue {
    pub const fn new(property: &'static str) -> Self {
        Self { property }
    }
}

#[derive(Error, Debug)]
pub enum FluentgenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in file {file}: {message}")]
    ParseError { file: PathBuf, message: String },

    #[error("Syn parse error: {0}")]
    SynParse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("fluentgen.toml not found searching upward from {search_start}")]
    ConfigNotFound { search_start: PathBuf },

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("Workspace scan error: {0}")]
    WorkspaceScan(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("Invalid glob pattern: {0}")]
    Pattern(String),

    #[error("Invalid regex pattern: {0}")]
    Regex(String),
}

impl From<syn::Error> for FluentgenError {
    fn from(err: syn::Error) -> Self {
        FluentgenError::SynParse(err.to_string())
    }
}

impl From<regex::Error> for FluentgenError {
    fn from(err: regex::Error) -> Self {
        FluentgenError::Regex(err.to_string())
    }
}

impl From<glob::PatternError> for FluentgenError {
    fn from(err: glob::PatternError) -> Self {
        FluentgenError::Pattern(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FluentgenError>;

impl FluentgenError {
    pub fn parse_error(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        FluentgenError::ParseError {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        FluentgenError::Config(message.into())
    }

    pub fn workspace_scan(message: impl Into<String>) -> Self {
        FluentgenError::WorkspaceScan(message.into())
    }
}
