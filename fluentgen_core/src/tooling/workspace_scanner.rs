//! Finds Rust source files and the module each one defines.

use crate::error::{FluentgenError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["target", "node_modules"];

/// A Rust source file inside some crate's `src/` tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Module path starting with `crate`, e.g. `["crate", "shapes"]`.
    pub module_path: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WorkspaceScanner {
    root: PathBuf,
}

impl WorkspaceScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All `.rs` files below the root that belong to a `src/` tree, sorted
    /// by path.
    pub fn scan(&self) -> Result<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Err(FluentgenError::workspace_scan(format!(
                "scan path {} is not a directory",
                self.root.display()
            )));
        }
        debug!("Scanning {:?} for Rust sources", self.root);

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));

        for entry in walker {
            let entry = entry.map_err(|e| FluentgenError::workspace_scan(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "rs") {
                continue;
            }
            match module_path_for(path) {
                Some(module_path) => {
                    trace!("Found {:?} as {}", path, module_path.join("::"));
                    files.push(SourceFile {
                        path: path.to_path_buf(),
                        module_path,
                    });
                }
                None => trace!("Skipping {:?}: not inside a src directory", path),
            }
        }

        debug!("Found {} Rust source files", files.len());
        Ok(files)
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

/// Module path of a file from its location below the nearest `src`
/// directory: `src/lib.rs` is `crate`, `src/a/mod.rs` is `crate::a` and
/// `src/a/b.rs` is `crate::a::b`.
pub fn module_path_for(path: &Path) -> Option<Vec<String>> {
    let components = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>();
    let src = components.iter().rposition(|part| *part == "src")?;
    let (file, dirs) = components[src + 1..].split_last()?;
    let stem = file.strip_suffix(".rs")?;

    let mut module_path = vec!["crate".to_string()];
    module_path.extend(dirs.iter().map(|dir| dir.to_string()));
    let is_root = dirs.is_empty() && matches!(stem, "lib" | "main");
    if stem != "mod" && !is_root {
        module_path.push(stem.to_string());
    }
    Some(module_path)
}
