// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One command-line invocation: find spec files, load them onto a fresh bus,
//! request a run, and write the report.

use crate::cli::{Cli, Command, OutputFormat};
use crate::discovery::{discover, resolve_module, DiscoveryError};
use crate::loader::{compile_file, register};
use crate::output::{write_json, write_text};
use crate::output_diagnostic::{print_debug, print_warning};
use crate::spec_file::LoadError;
use parking_lot::Mutex;
use regex::Regex;
use spectacle_bus::BusError;
use spectacle_core::events::emit;
use spectacle_core::{set_backtrace_capture, RunOptions, RunReport, Runner, SpecBus, SpecEvent, RUN_RESULTS};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Process exit codes
pub mod exit_codes {
    /// Every test passed
    pub const SUCCESS: i32 = 0;
    /// At least one test failed
    pub const FAILURES: i32 = 1;
    /// Spec files could not be found or loaded, or arguments were invalid
    pub const ERROR: i32 = 2;
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid --filter pattern: {0}")]
    Filter(#[from] regex::Error),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error("run failed: {0}")]
    Run(String),

    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Spec files named by the command line
pub fn spec_files(cli: &Cli) -> Result<Vec<PathBuf>, DiscoveryError> {
    match &cli.command {
        Command::All { dir } => {
            let dir = cli.resolve(dir);
            print_debug(format_args!("discovering *{}.{{toml,json}} in {}", cli.suffix, dir.display()));
            let files = discover(&dir, &cli.suffix)?;
            if files.is_empty() {
                print_warning(format_args!("no spec files found in {}", dir.display()));
            }
            Ok(files)
        }
        Command::One { module } => Ok(vec![resolve_module(&cli.base_dir(), module)?]),
    }
}

/// Load and run the spec files, returning the run's report
pub fn run(cli: &Cli) -> Result<RunReport, AppError> {
    set_backtrace_capture(cli.backtrace);
    let filter = cli.filter.as_deref().map(Regex::new).transpose()?;
    let files = spec_files(cli)?;

    let mut compiled = Vec::with_capacity(files.len());
    for path in &files {
        print_debug(format_args!("loading {}", path.display()));
        compiled.push(compile_file(path)?);
    }

    let bus = SpecBus::new();
    let runner = Runner::new().attach(&bus);
    let published = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&published);
    bus.subscribe(RUN_RESULTS, move |event: &SpecEvent| {
        if let SpecEvent::RunResults(report) = event {
            *sink.lock() = Some(report.clone());
        }
        Ok(())
    });

    for groups in &compiled {
        register(&bus, groups)?;
    }

    if let Some(filter) = &filter {
        for group in runner.test_groups() {
            let description = group.description();
            if !filter.is_match(&description) {
                print_debug(format_args!("skipping group '{description}'"));
                runner.remove_group(&group);
            }
        }
    }

    let options = RunOptions::muted().with_verbose(cli.verbose);
    let delivery = emit(&bus, SpecEvent::RunRequested(options))?;
    if let Some(failure) = delivery.failures.first() {
        return Err(AppError::Run(failure.message.clone()));
    }

    let report = published.lock().take();
    report.ok_or_else(|| AppError::Run("no run results were published".to_string()))
}

/// Run and write the report to `out`; returns the process exit code
pub fn execute<W: Write>(cli: &Cli, out: &mut W, color: bool) -> Result<i32, AppError> {
    let report = run(cli)?;
    match cli.output_format {
        OutputFormat::Text => write_text(out, &report, color)?,
        OutputFormat::Json => write_json(out, &report)?,
    }
    Ok(if report.has_failures() {
        exit_codes::FAILURES
    } else {
        exit_codes::SUCCESS
    })
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
