// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runner: executes registered root groups and aggregates statistics.
//!
//! A runner can be driven directly, or attached to a bus so that declared
//! groups register themselves and a `run requested` event triggers the run.

use crate::describe::Describe;
use crate::error::SpecError;
use crate::events::{emit, SpecBus, SpecEvent, NEW_TEST_GROUP, RUN_REQUESTED};
use crate::report::{render, ReportLine};
use crate::stats::{Stats, StatsSnapshot};
use crate::time::ClockHandle;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use spectacle_bus::WeakEventBus;
use std::sync::Arc;

/// How a run reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Also list passing tests
    pub verbose: bool,
    /// Do not print the report
    pub muted: bool,
}

impl RunOptions {
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            muted: false,
        }
    }

    pub fn muted() -> Self {
        Self {
            verbose: false,
            muted: true,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }
}

/// Everything one `run_all` produced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub lines: Vec<ReportLine>,
    pub stats: StatsSnapshot,
}

impl RunReport {
    /// Rendered report lines
    pub fn results(&self) -> Vec<String> {
        render(&self.lines)
    }

    pub fn has_failures(&self) -> bool {
        self.stats.number_of_failed_tests > 0
    }
}

struct RunnerState {
    test_groups: Vec<Describe>,
    stats: Stats,
    results: Vec<ReportLine>,
    running: bool,
}

/// Handle to a runner. Clones share the same registry and statistics.
#[derive(Clone)]
pub struct Runner {
    state: Arc<Mutex<RunnerState>>,
    bus: Option<WeakEventBus<SpecEvent>>,
}

impl Runner {
    pub fn new() -> Self {
        Self::with_clock(ClockHandle::default())
    }

    pub fn with_clock(clock: ClockHandle) -> Self {
        Self {
            state: Arc::new(Mutex::new(RunnerState {
                test_groups: Vec::new(),
                stats: Stats::new(clock),
                results: Vec::new(),
                running: false,
            })),
            bus: None,
        }
    }

    /// Subscribe to group declarations and run requests on `bus`.
    ///
    /// The returned handle publishes `run results` on the same bus.
    pub fn attach(mut self, bus: &SpecBus) -> Self {
        self.bus = Some(bus.downgrade());

        let registrar = self.clone();
        bus.subscribe(NEW_TEST_GROUP, move |event: &SpecEvent| {
            if let SpecEvent::NewTestGroup(group) = event {
                registrar.add_group(group.clone());
            }
            Ok(())
        });

        let trigger = self.clone();
        bus.subscribe(RUN_REQUESTED, move |event: &SpecEvent| {
            if let SpecEvent::RunRequested(options) = event {
                trigger.run_all(*options)?;
            }
            Ok(())
        });

        self
    }

    /// Register a group; returns the registry after the change
    pub fn add_group(&self, group: Describe) -> Vec<Describe> {
        let mut state = self.state.lock();
        state.test_groups.push(group);
        state.test_groups.clone()
    }

    /// Unregister the first registration of `group`; returns the registry
    pub fn remove_group(&self, group: &Describe) -> Vec<Describe> {
        let mut state = self.state.lock();
        if let Some(index) = state.test_groups.iter().position(|g| g.same_group(group)) {
            state.test_groups.remove(index);
        }
        state.test_groups.clone()
    }

    pub fn test_groups(&self) -> Vec<Describe> {
        self.state.lock().test_groups.clone()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.state.lock().stats.snapshot()
    }

    /// Rendered report of the last run
    pub fn results(&self) -> Vec<String> {
        render(&self.state.lock().results)
    }

    /// Run every registered root group.
    ///
    /// Groups run muted; the consolidated report, with a statistics summary,
    /// is printed unless muted and published on `run results`.
    pub fn run_all(&self, options: RunOptions) -> Result<RunReport, SpecError> {
        let groups = {
            let mut state = self.state.lock();
            if state.running {
                return Err(SpecError::AlreadyRunning {
                    description: "runner".to_string(),
                });
            }
            state.running = true;
            state.stats.start_time_tracking();
            state.test_groups.clone()
        };

        let outcome = run_groups(&groups, options);

        let report = {
            let mut state = self.state.lock();
            state.running = false;
            let mut lines = outcome?;
            for group in groups.iter().filter(|g| g.is_root()) {
                let (tests, failed) = group.tally();
                state.stats.add(tests, failed);
            }
            state.stats.stop_time_tracking();

            lines.extend(
                state
                    .stats
                    .summary_lines()
                    .into_iter()
                    .map(ReportLine::summary),
            );
            state.results = lines.clone();
            RunReport {
                lines,
                stats: state.stats.snapshot(),
            }
        };

        if !options.muted {
            for line in report.results() {
                println!("{line}");
            }
        }
        if let Some(bus) = self.bus.as_ref().and_then(WeakEventBus::upgrade) {
            emit(&bus, SpecEvent::RunResults(report.clone()))?;
        }
        Ok(report)
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Runner")
            .field("test_groups", &state.test_groups.len())
            .field("stats", &state.stats)
            .finish_non_exhaustive()
    }
}

/// Run each root group muted and collect its lines; nested groups are skipped
fn run_groups(groups: &[Describe], options: RunOptions) -> Result<Vec<ReportLine>, SpecError> {
    let mut lines = Vec::new();
    for group in groups.iter().filter(|g| g.is_root()) {
        group.run(options.with_muted(true))?;
        lines.extend(group.report());
    }
    Ok(lines)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
