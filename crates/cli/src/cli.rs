// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

/// Run declarative describe/it spec files
#[derive(Parser, Debug, Clone)]
#[command(name = "spectacle", version, about = "Run declarative describe/it spec files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Also list passing tests
    #[arg(short, long, global = true, env = "SPECTACLE_VERBOSE")]
    pub verbose: bool,

    /// File name suffix that marks a spec file, before the extension
    #[arg(long, global = true, default_value = "_spec", env = "SPECTACLE_SUFFIX")]
    pub suffix: String,

    /// Only run top-level groups whose description matches this regex
    #[arg(long, global = true, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Report format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Base directory for relative paths
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Print loading and discovery diagnostics to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Include captured backtraces in failure traces
    #[arg(long, global = true, env = "SPECTACLE_BACKTRACE")]
    pub backtrace: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run every spec file directly inside a directory
    All {
        /// Directory to scan (not recursive)
        dir: PathBuf,
    },
    /// Run a single spec file
    One {
        /// Spec file path, with or without its extension
        module: PathBuf,
    },
}

impl Cli {
    /// Directory relative paths are resolved against
    pub fn base_dir(&self) -> PathBuf {
        self.cwd.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve `path` against `--cwd` unless it is absolute
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir().join(path)
        }
    }
}

/// Report format
#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented report lines
    #[default]
    Text,
    /// One JSON document with report lines and statistics
    Json,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
