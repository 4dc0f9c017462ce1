// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Locating spec files on disk.

use crate::spec_file::SpecFormat;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("spec directory not found: {}", .0.display())]
    MissingDir(PathBuf),

    #[error("spec file not found: {}", .0.display())]
    MissingModule(PathBuf),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to read directory entry: {0}")]
    Entry(#[from] glob::GlobError),
}

/// Spec files directly inside `dir` whose stem ends with `suffix`.
///
/// Subdirectories are not searched. The result is sorted by path so runs
/// are reproducible.
pub fn discover(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !dir.is_dir() {
        return Err(DiscoveryError::MissingDir(dir.to_path_buf()));
    }

    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let suffix = glob::Pattern::escape(suffix);
    let mut found = Vec::new();
    for ext in SpecFormat::EXTENSIONS {
        for entry in glob::glob(&format!("{base}/*{suffix}.{ext}"))? {
            let path = entry?;
            if path.is_file() {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Find the spec file a module argument names.
///
/// Tries the path as given, then with each supported extension appended.
/// A dotted name without separators, such as `specs.math_spec`, is also
/// tried as `specs/math_spec`. Relative paths are taken from `base`.
pub fn resolve_module(base: &Path, module: &Path) -> Result<PathBuf, DiscoveryError> {
    let mut stems = vec![module.to_path_buf()];
    let text = module.to_string_lossy();
    if text.contains('.') && !text.contains(std::path::MAIN_SEPARATOR) && !text.contains('/') {
        stems.push(text.split('.').collect::<PathBuf>());
    }

    for stem in stems {
        let stem = base.join(stem);
        if stem.is_file() && SpecFormat::from_path(&stem).is_some() {
            return Ok(stem);
        }
        for ext in SpecFormat::EXTENSIONS {
            let mut candidate = OsString::from(stem.as_os_str());
            candidate.push(".");
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    Err(DiscoveryError::MissingModule(module.to_path_buf()))
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
