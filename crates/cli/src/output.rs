// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report output for terminals and machine consumers.

use serde::Serialize;
use spectacle_core::{LineKind, ReportLine, RunReport, StatsSnapshot};
use std::io::{self, Write};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Whether report lines written to a stream should be colored
pub fn use_color(is_terminal: bool) -> bool {
    is_terminal && !crate::env::no_color()
}

/// Render one line, coloring verdicts and trace markers when `color` is set
pub fn paint(line: &ReportLine, color: bool) -> String {
    if !color {
        return line.to_string();
    }
    let indent = line.indent();
    match &line.kind {
        LineKind::Group { description, .. } if line.marks_ok() => {
            format!("{indent}{description}: {GREEN}ok{RESET}")
        }
        LineKind::Passed { description } => format!("{indent}- {description}: {GREEN}ok{RESET}"),
        LineKind::Failed { description } => format!("{indent}- {description}: {RED}fail{RESET}"),
        LineKind::TraceHeader | LineKind::TraceError { .. } => {
            let text = line.to_string();
            format!("{indent}{RED}{}{RESET}", text.trim_start())
        }
        _ => line.to_string(),
    }
}

/// Write the report as indented text
pub fn write_text<W: Write>(writer: &mut W, report: &RunReport, color: bool) -> io::Result<()> {
    for line in &report.lines {
        writeln!(writer, "{}", paint(line, color))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    lines: &'a [ReportLine],
    text: Vec<String>,
    stats: &'a StatsSnapshot,
}

/// Write the report as a single JSON document
pub fn write_json<W: Write>(writer: &mut W, report: &RunReport) -> io::Result<()> {
    let document = JsonReport {
        passed: !report.has_failures(),
        lines: &report.lines,
        text: report.results(),
        stats: &report.stats,
    };
    serde_json::to_writer_pretty(&mut *writer, &document).map_err(io::Error::other)?;
    writeln!(writer)
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
