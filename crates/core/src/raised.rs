// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by code under test.
//!
//! A [`Raised`] is what a producer, a shared-state provider, or a comparison
//! strategy hands back when something goes wrong. It is data, not a crash:
//! the test that observed it records it and the run carries on.

use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

static CAPTURE_BACKTRACES: AtomicBool = AtomicBool::new(false);

/// Turn native backtrace capture on or off for errors raised from now on.
///
/// Off by default; when on, every [`Raised`] records the backtrace of the
/// point where it was created and includes it in its stack trace.
pub fn set_backtrace_capture(enabled: bool) {
    CAPTURE_BACKTRACES.store(enabled, Ordering::Relaxed);
}

fn capture_backtrace() -> Vec<String> {
    if !CAPTURE_BACKTRACES.load(Ordering::Relaxed) {
        return Vec::new();
    }
    let captured = Backtrace::force_capture();
    match captured.status() {
        BacktraceStatus::Captured => captured
            .to_string()
            .lines()
            .map(|line| line.trim_end().to_string())
            .filter(|line| !line.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Named error type used for exact-type matching in `raise_error`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorKind(Cow<'static, str>);

impl ErrorKind {
    pub const ASSERTION: ErrorKind = ErrorKind(Cow::Borrowed("AssertionError"));
    pub const ATTRIBUTE: ErrorKind = ErrorKind(Cow::Borrowed("AttributeError"));
    pub const TYPE: ErrorKind = ErrorKind(Cow::Borrowed("TypeError"));
    pub const VALUE: ErrorKind = ErrorKind(Cow::Borrowed("ValueError"));
    pub const KEY: ErrorKind = ErrorKind(Cow::Borrowed("KeyError"));
    pub const ZERO_DIVISION: ErrorKind = ErrorKind(Cow::Borrowed("ZeroDivisionError"));
    pub const OVERFLOW: ErrorKind = ErrorKind(Cow::Borrowed("OverflowError"));
    pub const RECURSION: ErrorKind = ErrorKind(Cow::Borrowed("RecursionError"));
    pub const USAGE: ErrorKind = ErrorKind(Cow::Borrowed("UsageError"));
    pub const PANIC: ErrorKind = ErrorKind(Cow::Borrowed("Panic"));

    /// Create a kind from a free-form name
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The kind naming a Rust type, qualified by its module path
    pub fn of<E: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<E>()))
    }

    /// Full name as registered
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Name without its module path or generic arguments
    pub fn short_name(&self) -> &str {
        let base = self.0.split('<').next().unwrap_or(&self.0);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Exact-type match against a raised kind.
    ///
    /// Names must match in full; use [`ErrorKind::of`] to name a Rust type.
    /// `ParseIntError` alone does not match `core::num::error::ParseIntError`,
    /// since short names such as `Error` are shared by many types.
    pub fn matches(&self, actual: &ErrorKind) -> bool {
        self.0 == actual.0
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// An error captured while running a test.
#[derive(Clone, Debug, PartialEq)]
pub struct Raised {
    kind: ErrorKind,
    message: String,
    context: Vec<String>,
    backtrace: Vec<String>,
    misuse: bool,
}

impl Raised {
    /// Raise an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
            backtrace: capture_backtrace(),
            misuse: false,
        }
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ASSERTION, message)
    }

    pub fn attribute(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ATTRIBUTE, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TYPE, message)
    }

    pub fn zero_division() -> Self {
        Self::new(ErrorKind::ZERO_DIVISION, "division by zero")
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::USAGE, message).as_misuse()
    }

    pub fn panic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PANIC, message)
    }

    /// The error's kind
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The error's message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Context frames, innermost first
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Mark as a mistake in the test itself rather than in the code under
    /// test. Negation never turns a misuse into a pass.
    pub fn as_misuse(mut self) -> Self {
        self.misuse = true;
        self
    }

    pub fn is_misuse(&self) -> bool {
        self.misuse
    }

    /// Attach a context frame as the error travels outward
    pub fn within(mut self, frame: impl Into<String>) -> Self {
        self.context.push(frame.into());
        self
    }

    /// Stack trace, outermost frame first, ending with `Kind: message`.
    pub fn stack_trace(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.context.iter().rev().cloned().collect();
        lines.extend(self.backtrace.iter().cloned());
        lines.push(self.to_string());
        lines
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl<E> From<E> for Raised
where
    E: std::error::Error + 'static,
{
    fn from(err: E) -> Self {
        Self::new(ErrorKind::of::<E>(), err.to_string())
    }
}

#[cfg(test)]
#[path = "raised_tests.rs"]
mod tests;
