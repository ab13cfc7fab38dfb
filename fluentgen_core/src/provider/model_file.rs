//! Type descriptions read from JSON or TOML model files.
//!
//! This is how non-Rust targets reach the pipeline: a compiler plugin or a
//! hand-written file lists the types, and the Kotlin emitter renders them.
//!
//! ```toml
//! [[types]]
//! qualified_name = "com/example/Point"
//!
//! [[types.constructors]]
//! primary = true
//! parameters = [
//!     { name = "x", type = { kind = { named = { name = "Int" } } } },
//! ]
//!
//! [types.builder]
//! prefix = "with"
//! ```

use super::{ProvidedType, TypeModelProvider};
use crate::config::PartialBuilderConfig;
use crate::error::{FluentgenError, Result};
use crate::model::raw::RawTypeDescription;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelFile {
    #[serde(default)]
    pub types: Vec<ModelEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    #[serde(flatten)]
    pub description: RawTypeDescription,
    #[serde(default, skip_serializing_if = "PartialBuilderConfig::is_empty")]
    pub builder: PartialBuilderConfig,
}

impl ModelFile {
    pub fn load(path: &Path) -> Result<ModelFile> {
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&contents)?),
            Some("toml") => Ok(toml::from_str(&contents)?),
            _ => Err(FluentgenError::parse_error(
                path,
                "model files must have a .json or .toml extension",
            )),
        }
    }
}

/// Reads every file matching a set of glob patterns.
pub struct ModelFileProvider {
    patterns: Vec<String>,
}

impl ModelFileProvider {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Matching paths, deduplicated and sorted within each pattern.
    fn paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for pattern in &self.patterns {
            let mut matched = glob::glob(pattern)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| FluentgenError::Io(e.into_error()))?;
            if matched.is_empty() {
                return Err(FluentgenError::config(format!(
                    "model file pattern `{}` matched no files",
                    pattern
                )));
            }
            matched.sort();
            for path in matched {
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }
        Ok(paths)
    }
}

impl TypeModelProvider for ModelFileProvider {
    fn name(&self) -> &str {
        "model"
    }

    fn descriptions(&self) -> Result<Vec<ProvidedType>> {
        let mut types = Vec::new();
        for path in self.paths()? {
            let file = ModelFile::load(&path)?;
            debug!("Read {} types from {:?}", file.types.len(), path);
            types.extend(file.types.into_iter().map(|entry| ProvidedType {
                description: entry.description,
                config: entry.builder,
                origin: Some(path.clone()),
            }));
        }
        info!("Loaded {} types from model files", types.len());
        Ok(types)
    }
}
