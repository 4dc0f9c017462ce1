// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Harness errors.
//!
//! These signal that the harness itself was misused. Failures of the code
//! under test never appear here; they are recorded in test results.

use spectacle_bus::BusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("cannot run nested group '{description}': only a root group may be run")]
    NotRoot { description: String },

    #[error("group '{description}' is already running")]
    AlreadyRunning { description: String },

    #[error(transparent)]
    Bus(#[from] BusError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown comparison strategy '{0}'")]
pub struct UnknownStrategy(pub String);
