// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Time abstraction for deterministic run timing.
//!
//! Run statistics read a [`Clock`]; tests swap in a [`FakeClock`] so elapsed
//! time is exact.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Clock trait for time abstraction
pub trait Clock: Send + Sync {
    /// Current time as microseconds since epoch
    fn now_micros(&self) -> u64;
}

/// Real clock using system time
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_micros(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros();
        u64::try_from(micros).unwrap_or(u64::MAX)
    }
}

/// Fake clock whose clones share one counter
#[derive(Clone, Debug, Default)]
pub struct FakeClock {
    current_micros: Arc<AtomicU64>,
}

impl FakeClock {
    pub fn new(start_micros: u64) -> Self {
        Self {
            current_micros: Arc::new(AtomicU64::new(start_micros)),
        }
    }

    pub fn advance_micros(&self, micros: u64) {
        self.current_micros.fetch_add(micros, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now_micros(&self) -> u64 {
        self.current_micros.load(Ordering::SeqCst)
    }
}

/// Clock handle that can be either real or fake
#[derive(Clone, Debug)]
pub enum ClockHandle {
    System(SystemClock),
    Fake(FakeClock),
}

impl ClockHandle {
    pub fn system() -> Self {
        Self::System(SystemClock)
    }
}

impl Clock for ClockHandle {
    fn now_micros(&self) -> u64 {
        match self {
            Self::System(c) => c.now_micros(),
            Self::Fake(c) => c.now_micros(),
        }
    }
}

impl Default for ClockHandle {
    fn default() -> Self {
        Self::system()
    }
}

impl From<FakeClock> for ClockHandle {
    fn from(clock: FakeClock) -> Self {
        Self::Fake(clock)
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
