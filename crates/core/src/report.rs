// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structured report lines.
//!
//! Groups build their report as [`ReportLine`]s; the plain-text form is the
//! `Display` rendering, and the CLI colors lines by kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a report line describes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineKind {
    /// Group header; `passed` when the subtree has tests and all passed.
    /// Only a root header renders the marker.
    Group { description: String, passed: bool },
    Passed { description: String },
    Failed { description: String },
    TraceHeader,
    TraceFrame { text: String },
    /// Final trace line, `Kind: message`
    TraceError { text: String },
    /// Run statistics line appended by the runner
    Summary { text: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    /// Nesting depth of the owning group
    pub depth: usize,
    #[serde(flatten)]
    pub kind: LineKind,
}

impl ReportLine {
    pub fn new(depth: usize, kind: LineKind) -> Self {
        Self { depth, kind }
    }

    pub fn summary(text: impl Into<String>) -> Self {
        Self::new(0, LineKind::Summary { text: text.into() })
    }

    /// Leading whitespace for this line
    pub fn indent(&self) -> String {
        let extra = match self.kind {
            LineKind::Group { .. } | LineKind::Summary { .. } => 0,
            LineKind::Passed { .. } | LineKind::Failed { .. } => 1,
            LineKind::TraceHeader | LineKind::TraceFrame { .. } | LineKind::TraceError { .. } => 2,
        };
        "  ".repeat(self.depth + extra)
    }

    /// Whether this is a root header carrying the `ok` marker
    pub fn marks_ok(&self) -> bool {
        self.depth == 0 && matches!(self.kind, LineKind::Group { passed: true, .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.kind, LineKind::Failed { .. })
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = self.indent();
        match &self.kind {
            LineKind::Group { description, .. } => {
                write!(f, "{indent}{description}")?;
                if self.marks_ok() {
                    f.write_str(": ok")?;
                }
                Ok(())
            }
            LineKind::Passed { description } => write!(f, "{indent}- {description}: ok"),
            LineKind::Failed { description } => write!(f, "{indent}- {description}: fail"),
            LineKind::TraceHeader => write!(f, "{indent}* STACK TRACE"),
            LineKind::TraceFrame { text } => write!(f, "{indent}| {text}"),
            LineKind::TraceError { text } => write!(f, "{indent}* {text}"),
            LineKind::Summary { text } => write!(f, "{indent}{text}"),
        }
    }
}

/// Render lines to their plain-text form
pub fn render(lines: &[ReportLine]) -> Vec<String> {
    lines.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
