// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run statistics.

use crate::time::{Clock, ClockHandle};
use serde::{Deserialize, Serialize};

/// Counters and timing accumulated across runs.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    clock: ClockHandle,
    number_of_tests: usize,
    number_of_failed_tests: usize,
    time_started: Option<u64>,
    time_ended: Option<u64>,
}

/// Point-in-time copy of [`Stats`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub number_of_tests: usize,
    pub number_of_failed_tests: usize,
    pub success_failure_rate: f64,
    pub total_time_elapsed: u64,
}

impl Stats {
    pub fn new(clock: ClockHandle) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    /// Record the start time; later calls keep the first one
    pub fn start_time_tracking(&mut self) {
        if self.time_started.is_none() {
            self.time_started = Some(self.clock.now_micros());
        }
    }

    pub fn stop_time_tracking(&mut self) {
        self.time_ended = Some(self.clock.now_micros());
    }

    /// Count a batch of finished tests, `failed` of which failed
    pub fn add(&mut self, tests: usize, failed: usize) {
        self.number_of_tests += tests;
        self.number_of_failed_tests += failed.min(tests);
    }

    pub fn number_of_tests(&self) -> usize {
        self.number_of_tests
    }

    pub fn number_of_failed_tests(&self) -> usize {
        self.number_of_failed_tests
    }

    pub fn time_started(&self) -> Option<u64> {
        self.time_started
    }

    pub fn time_ended(&self) -> Option<u64> {
        self.time_ended
    }

    /// Fraction of tests that passed; `0` when nothing ran
    pub fn success_failure_rate(&self) -> f64 {
        if self.number_of_tests == 0 {
            return 0.0;
        }
        let passed = self.number_of_tests - self.number_of_failed_tests;
        passed as f64 / self.number_of_tests as f64
    }

    /// Microseconds between start and stop
    pub fn total_time_elapsed(&self) -> u64 {
        match (self.time_started, self.time_ended) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => 0,
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            number_of_tests: self.number_of_tests,
            number_of_failed_tests: self.number_of_failed_tests,
            success_failure_rate: self.success_failure_rate(),
            total_time_elapsed: self.total_time_elapsed(),
        }
    }

    /// Human-readable summary, one entry per line
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Tests ran: {}", self.number_of_tests),
            format!("Success rate: {:.1}%", self.success_failure_rate() * 100.0),
            format!("Total time: {} microseconds", self.total_time_elapsed()),
        ]
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
