// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative spec file documents.
//!
//! A spec file holds top-level `describe` groups. Each group may define
//! `let` and `before` values, `it` tests, and nested `describe` groups:
//!
//! ```toml
//! [[describe]]
//! name = "arithmetic"
//! let = { two = 2 }
//!
//!   [[describe.it]]
//!   name = "adds"
//!   expect = { "$add" = [1, { "$ref" = "two" }] }
//!   to = "eq"
//!   args = [3]
//! ```
//!
//! Values are kept as raw JSON until the loader compiles them into
//! expressions.

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading spec files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read spec file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported spec file extension: {}", path.display())]
    Extension { path: PathBuf },

    #[error("{}: {location}: {source}", path.display())]
    Expression {
        path: PathBuf,
        location: String,
        #[source]
        source: crate::expr::ExprError,
    },

    #[error("{}: {location}: evaluating args raised {raised}", path.display())]
    Args {
        path: PathBuf,
        location: String,
        raised: spectacle_core::Raised,
    },

    #[error("failed to register group '{name}': {source}")]
    Register {
        name: String,
        #[source]
        source: spectacle_core::SpecError,
    },
}

/// Supported document formats, keyed by file extension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecFormat {
    Toml,
    Json,
}

impl SpecFormat {
    /// Extensions tried, in order, when discovering and resolving files
    pub const EXTENSIONS: [&'static str; 2] = ["toml", "json"];

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A whole spec file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecFile {
    #[serde(default)]
    pub describe: Vec<GroupSpec>,
}

/// One `describe` group.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    pub name: String,

    /// Values produced at most once per run
    #[serde(default, rename = "let")]
    pub lets: BTreeMap<String, JsonValue>,

    /// Values produced afresh before every test
    #[serde(default)]
    pub before: BTreeMap<String, JsonValue>,

    #[serde(default)]
    pub it: Vec<TestSpec>,

    #[serde(default)]
    pub describe: Vec<GroupSpec>,
}

/// One `it` test.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSpec {
    pub name: String,

    /// Expression producing the actual value. A JSON `null` is a nil value,
    /// not a missing one.
    #[serde(default, deserialize_with = "present")]
    pub expect: Option<JsonValue>,

    /// Strategy the actual value must satisfy
    #[serde(default)]
    pub to: Option<String>,

    /// Strategy the actual value must fail
    #[serde(default, alias = "to_not")]
    pub not_to: Option<String>,

    /// Expected values handed to the strategy
    #[serde(default)]
    pub args: Vec<JsonValue>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

impl SpecFile {
    /// Parse a document in the given format
    pub fn parse(content: &str, format: SpecFormat, path: &Path) -> Result<Self, LoadError> {
        match format {
            SpecFormat::Toml => toml::from_str(content).map_err(|source| LoadError::Toml {
                path: path.to_path_buf(),
                source,
            }),
            SpecFormat::Json => serde_json::from_str(content).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load a spec file, choosing the format by extension
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let format = SpecFormat::from_path(path).ok_or_else(|| LoadError::Extension {
            path: path.to_path_buf(),
        })?;
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, format, path)
    }
}

#[cfg(test)]
#[path = "spec_file_tests.rs"]
mod tests;
