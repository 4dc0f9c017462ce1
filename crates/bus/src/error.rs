// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the event bus.

use thiserror::Error;

/// Error a subscriber callback may return.
///
/// Any `std::error::Error` converts into this with `?`.
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

/// Structural misuse of the bus itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// A subscriber tried to publish on the topic currently being dispatched.
    #[error("re-entrant publish on topic '{topic}'")]
    Reentrant { topic: String },
}
