// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! `SPECTACLE_VERBOSE`, `SPECTACLE_SUFFIX` and `SPECTACLE_BACKTRACE` are read
//! by the argument parser; everything else goes through these accessors.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

// Re-export name constants for callers that need the raw name string.
pub use names::*;

/// `NO_COLOR`: disables colored report output when set to a non-empty value.
pub fn no_color() -> bool {
    std::env::var_os(names::NO_COLOR).is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
