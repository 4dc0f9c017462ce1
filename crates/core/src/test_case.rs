// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A single deferred assertion.
//!
//! Declaring a test records a producer and a comparison; nothing runs until
//! [`Test::run`]. Mistakes made while declaring are remembered and reported
//! as a failing result when the test runs, so one malformed test does not
//! stop its siblings from loading.

use crate::comparison::{Comparison, Outcome};
use crate::raised::Raised;
use crate::scope::{Producer, Scope};
use crate::value::Value;
use parking_lot::Mutex;
use serde::Serialize;
use spectacle_bus::panic_message;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Message recorded when a negated test passes.
pub const NEGATED_PASS_MESSAGE: &str =
    "The test passed when it should have failed in a to_not statement";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    #[default]
    Normal,
    Negated,
}

/// Result of the most recent run of a test.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestResult {
    /// `None` until the test has run
    pub success: Option<bool>,
    pub err: Option<Raised>,
    /// Outermost frame first; the last line is `Kind: message`
    pub stack_trace: Option<Vec<String>>,
}

impl TestResult {
    fn passed() -> Self {
        Self {
            success: Some(true),
            err: None,
            stack_trace: None,
        }
    }

    fn failed(err: Raised) -> Self {
        Self {
            success: Some(false),
            stack_trace: Some(err.stack_trace()),
            err: Some(err),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.success == Some(true)
    }

    pub fn is_fail(&self) -> bool {
        self.success == Some(false)
    }
}

struct TestState {
    description: String,
    actual: Option<Producer>,
    comparison: Option<Comparison>,
    polarity: Polarity,
    misuse: Option<Raised>,
    result: TestResult,
}

/// Handle to a declared test.
///
/// Clones share the same test. Declaration methods return the handle so
/// calls can be chained.
#[derive(Clone)]
pub struct Test {
    inner: Arc<Mutex<TestState>>,
}

impl Test {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TestState {
                description: description.into(),
                actual: None,
                comparison: None,
                polarity: Polarity::Normal,
                misuse: None,
                result: TestResult::default(),
            })),
        }
    }

    /// Bind the producer of the actual value
    pub fn expect<F, V>(&self, producer: F) -> Test
    where
        F: Fn(&mut Scope) -> Result<V, Raised> + Send + Sync + 'static,
        V: Into<Value>,
    {
        let producer: Producer = Arc::new(move |scope: &mut Scope| producer(scope).map(Into::into));
        self.bind_actual(producer)
    }

    /// Bind a fixed actual value
    pub fn expect_value(&self, value: impl Into<Value>) -> Test {
        let value = value.into();
        self.bind_actual(Arc::new(move |_: &mut Scope| Ok(value.clone())))
    }

    /// Bind the comparison the actual value must satisfy
    pub fn to(&self, comparison: Comparison) -> Test {
        self.bind_comparison(Ok(comparison), Polarity::Normal)
    }

    /// Bind the comparison the actual value must fail
    pub fn to_not(&self, comparison: Comparison) -> Test {
        self.bind_comparison(Ok(comparison), Polarity::Negated)
    }

    /// Bind a comparison by strategy name
    pub fn to_named(&self, strategy: &str, expected: Vec<Value>) -> Test {
        let comparison = Comparison::named(strategy, expected).map_err(|e| e.to_string());
        self.bind_comparison(comparison, Polarity::Normal)
    }

    /// Bind a negated comparison by strategy name
    pub fn to_not_named(&self, strategy: &str, expected: Vec<Value>) -> Test {
        let comparison = Comparison::named(strategy, expected).map_err(|e| e.to_string());
        self.bind_comparison(comparison, Polarity::Negated)
    }

    /// Alias of [`Test::to`]
    pub fn should(&self, comparison: Comparison) -> Test {
        self.to(comparison)
    }

    /// Alias of [`Test::to_not`]
    pub fn should_not(&self, comparison: Comparison) -> Test {
        self.to_not(comparison)
    }

    pub fn description(&self) -> String {
        self.inner.lock().description.clone()
    }

    pub fn polarity(&self) -> Polarity {
        self.inner.lock().polarity
    }

    pub fn comparison(&self) -> Option<Comparison> {
        self.inner.lock().comparison.clone()
    }

    /// Result of the most recent run
    pub fn result(&self) -> TestResult {
        self.inner.lock().result.clone()
    }

    /// Run outside any group, with no shared state.
    pub fn run(&self) -> TestResult {
        self.run_in(&mut Scope::detached())
    }

    /// Run against a group's scope. `before` values are produced first.
    pub(crate) fn run_in(&self, scope: &mut Scope) -> TestResult {
        let (description, actual, comparison, polarity, misuse) = {
            let state = self.inner.lock();
            (
                state.description.clone(),
                state.actual.clone(),
                state.comparison.clone(),
                state.polarity,
                state.misuse.clone(),
            )
        };

        let verdict = match (misuse, actual, comparison) {
            (Some(err), _, _) => Err(err),
            (None, None, _) => Err(Raised::usage(
                "no actual value: call expect before running the test",
            )),
            (None, _, None) => Err(Raised::usage(
                "no comparison: call to or to_not before running the test",
            )),
            (None, Some(actual), Some(comparison)) => {
                judge(scope, &actual, &comparison, polarity)
            }
        };

        let result = match verdict {
            Ok(()) => TestResult::passed(),
            Err(err) => {
                let mut err = err.within(format!("in it \"{description}\""));
                if !scope.path().is_empty() {
                    err = err.within(format!("in describe \"{}\"", scope.path().join(" > ")));
                }
                TestResult::failed(err)
            }
        };

        self.inner.lock().result = result.clone();
        result
    }

    fn bind_actual(&self, producer: Producer) -> Test {
        {
            let mut state = self.inner.lock();
            if state.actual.is_some() {
                state.record_misuse("expect was called more than once on this test");
            } else {
                state.actual = Some(producer);
            }
        }
        self.clone()
    }

    fn bind_comparison(&self, comparison: Result<Comparison, String>, polarity: Polarity) -> Test {
        {
            let mut state = self.inner.lock();
            if state.comparison.is_some() {
                state.record_misuse("a comparison was bound more than once on this test");
            } else {
                match comparison {
                    Ok(comparison) => {
                        state.comparison = Some(comparison);
                        state.polarity = polarity;
                    }
                    Err(message) => state.record_misuse(message),
                }
            }
        }
        self.clone()
    }
}

impl TestState {
    /// The first mistake wins
    fn record_misuse(&mut self, message: impl Into<String>) {
        if self.misuse.is_none() {
            self.misuse = Some(Raised::usage(message));
        }
    }
}

impl std::fmt::Debug for Test {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Test")
            .field("description", &state.description)
            .field("comparison", &state.comparison)
            .field("polarity", &state.polarity)
            .field("result", &state.result)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Test {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Produce befores and the actual value, judge it, and apply polarity.
fn judge(
    scope: &mut Scope,
    actual: &Producer,
    comparison: &Comparison,
    polarity: Polarity,
) -> Result<(), Raised> {
    // Setup faults fail the test whatever its polarity.
    catch_unwind(AssertUnwindSafe(|| scope.prepare_befores()))
        .unwrap_or_else(|panic| Err(Raised::panic(panic_message(panic.as_ref()))))?;

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        comparison.evaluate(&mut || produce(actual, scope))
    }))
    .unwrap_or_else(|panic| Outcome::Fail(Raised::panic(panic_message(panic.as_ref()))));

    match (polarity, outcome) {
        (Polarity::Normal, Outcome::Pass) => Ok(()),
        (Polarity::Normal, Outcome::Fail(err)) => Err(err),
        (Polarity::Negated, Outcome::Pass) => Err(Raised::assertion(NEGATED_PASS_MESSAGE)),
        (Polarity::Negated, Outcome::Fail(_)) => Ok(()),
        (_, Outcome::Misuse(err)) => Err(err),
    }
}

/// Run a producer, turning a panic into a raised error
fn produce(actual: &Producer, scope: &mut Scope) -> Result<Value, Raised> {
    catch_unwind(AssertUnwindSafe(|| actual(scope)))
        .unwrap_or_else(|panic| Err(Raised::panic(panic_message(panic.as_ref()))))
}

#[cfg(test)]
#[path = "test_case_tests.rs"]
mod tests;
