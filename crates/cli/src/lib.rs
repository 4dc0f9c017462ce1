// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Spectacle command-line runner
//!
//! Discovers declarative spec files, loads their `describe` groups onto a
//! fresh event bus, and runs them with the `spectacle-core` runner.
//!
//! For file authoring, see the **[Spec File Reference](crate::docs::spec_files)**.

/// Documentation modules for docs.rs
pub mod docs {
    /// Spec file reference - groups, shared values, tests, and expressions.
    #[doc = include_str!("../docs/SPEC_FILES.md")]
    pub mod spec_files {}
}

pub mod app;
pub mod cli;
pub mod discovery;
pub mod env;
pub mod expr;
pub mod loader;
pub mod output;
pub mod output_diagnostic;
pub mod spec_file;

pub use app::{exit_codes, AppError};
pub use cli::{Cli, Command, OutputFormat};
pub use discovery::{discover, resolve_module, DiscoveryError};
pub use expr::{Expr, ExprError};
pub use spec_file::{LoadError, SpecFile, SpecFormat};
