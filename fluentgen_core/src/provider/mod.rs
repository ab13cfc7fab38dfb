//! Sources of raw type descriptions.
//!
//! A provider knows how to find target types and describe their shape; the
//! rest of the pipeline never looks at source files or metadata formats.

pub mod model_file;
pub mod rust_source;

pub use model_file::ModelFileProvider;
pub use rust_source::{RustSourceProvider, describe_derive_input};

use crate::config::PartialBuilderConfig;
use crate::error::Result;
use crate::model::raw::RawTypeDescription;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A target type as found by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidedType {
    pub description: RawTypeDescription,
    /// Builder options declared next to the type (attributes, model entry).
    #[serde(default)]
    pub config: PartialBuilderConfig,
    /// File the type was read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<PathBuf>,
}

impl ProvidedType {
    pub fn new(description: RawTypeDescription) -> Self {
        Self {
            description,
            config: PartialBuilderConfig::default(),
            origin: None,
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.description.qualified_name
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TypeModelProvider: Send + Sync {
    /// Short label used in logs and reports.
    fn name(&self) -> &str;

    /// Every target type this provider can see, in a stable order.
    fn descriptions(&self) -> Result<Vec<ProvidedType>>;
}
