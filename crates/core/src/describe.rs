// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test groups.
//!
//! A [`Describe`] owns its nested groups, its tests, and the shared state
//! they inherit. Only a root group can be run; running it runs every nested
//! group first and then its own tests, collecting one report.

use crate::error::SpecError;
use crate::events::{emit, SpecBus, SpecEvent};
use crate::raised::Raised;
use crate::report::{render, LineKind, ReportLine};
use crate::runner::RunOptions;
use crate::scope::{Bindings, Provider, Scope};
use crate::test_case::{Test, TestResult};
use crate::value::Value;
use parking_lot::Mutex;
use serde::Serialize;
use spectacle_bus::{EventBus, WeakEventBus};
use std::sync::{Arc, Weak};

/// Lifecycle of a group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Declared,
    Running,
    Reported,
}

struct GroupState {
    description: String,
    parent: Option<Weak<Mutex<GroupState>>>,
    depth: usize,
    bus: Option<WeakEventBus<SpecEvent>>,
    children: Vec<Describe>,
    tests: Vec<Test>,
    lets: Vec<(String, Provider)>,
    befores: Vec<(String, Provider)>,
    report: Vec<ReportLine>,
    phase: Phase,
    passed: Option<bool>,
}

impl GroupState {
    fn new(description: String, parent: Option<Weak<Mutex<GroupState>>>, depth: usize) -> Self {
        Self {
            description,
            parent,
            depth,
            bus: None,
            children: Vec::new(),
            tests: Vec::new(),
            lets: Vec::new(),
            befores: Vec::new(),
            report: Vec::new(),
            phase: Phase::Declared,
            passed: None,
        }
    }
}

/// Handle to a test group. Clones share the same group.
#[derive(Clone)]
pub struct Describe {
    inner: Arc<Mutex<GroupState>>,
}

/// Declare a root group and announce it on the bus.
pub fn describe(bus: &SpecBus, description: impl Into<String>) -> Result<Describe, SpecError> {
    let group = Describe::new(description);
    group.inner.lock().bus = Some(bus.downgrade());
    emit(bus, SpecEvent::NewTestGroup(group.clone()))?;
    Ok(group)
}

impl Describe {
    /// Create a root group that is not bound to any bus
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GroupState::new(description.into(), None, 0))),
        }
    }

    /// Declare a nested group
    pub fn describe(&self, description: impl Into<String>) -> Describe {
        let mut state = self.inner.lock();
        let mut child = GroupState::new(
            description.into(),
            Some(Arc::downgrade(&self.inner)),
            state.depth + 1,
        );
        child.bus = state.bus.clone();
        let child = Describe {
            inner: Arc::new(Mutex::new(child)),
        };
        state.children.push(child.clone());
        child
    }

    /// Declare a test in this group
    pub fn it(&self, description: impl Into<String>) -> Test {
        let test = Test::new(description);
        self.inner.lock().tests.push(test.clone());
        test
    }

    /// Share a fixed value, cached per run
    pub fn let_value(&self, name: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.define_let(name.into(), Provider::Value(value.into()))
    }

    /// Share a produced value; the producer runs at most once per run
    pub fn let_fn<F, V>(&self, name: impl Into<String>, producer: F) -> &Self
    where
        F: Fn(&mut Scope) -> Result<V, Raised> + Send + Sync + 'static,
        V: Into<Value>,
    {
        let producer = Arc::new(move |scope: &mut Scope| producer(scope).map(Into::into));
        self.define_let(name.into(), Provider::Producer(producer))
    }

    /// Share a fixed value, restored before every test
    pub fn before_value(&self, name: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.define_before(name.into(), Provider::Value(value.into()))
    }

    /// Share a produced value; the producer runs before every test
    pub fn before_fn<F, V>(&self, name: impl Into<String>, producer: F) -> &Self
    where
        F: Fn(&mut Scope) -> Result<V, Raised> + Send + Sync + 'static,
        V: Into<Value>,
    {
        let producer = Arc::new(move |scope: &mut Scope| producer(scope).map(Into::into));
        self.define_before(name.into(), Provider::Producer(producer))
    }

    pub fn description(&self) -> String {
        self.inner.lock().description.clone()
    }

    pub fn depth(&self) -> usize {
        self.inner.lock().depth
    }

    pub fn is_root(&self) -> bool {
        self.inner.lock().parent.is_none()
    }

    /// The enclosing group, if it is still alive
    pub fn parent(&self) -> Option<Describe> {
        let parent = self.inner.lock().parent.clone()?;
        parent.upgrade().map(|inner| Describe { inner })
    }

    pub fn children(&self) -> Vec<Describe> {
        self.inner.lock().children.clone()
    }

    pub fn tests(&self) -> Vec<Test> {
        self.inner.lock().tests.clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    /// `Some(true)` when the last run had tests and all passed
    pub fn passed(&self) -> Option<bool> {
        self.inner.lock().passed
    }

    /// Structured report of the last run
    pub fn report(&self) -> Vec<ReportLine> {
        self.inner.lock().report.clone()
    }

    /// Rendered report of the last run
    pub fn results(&self) -> Vec<String> {
        render(&self.inner.lock().report)
    }

    /// The bus this group announces on, if any and still alive
    pub fn bus(&self) -> Option<EventBus<SpecEvent>> {
        self.inner.lock().bus.as_ref().and_then(WeakEventBus::upgrade)
    }

    /// Run this group and everything nested in it.
    ///
    /// Returns the rendered report. The report is printed unless muted and
    /// published on the group's bus when it has one.
    pub fn run(&self, options: RunOptions) -> Result<Vec<String>, SpecError> {
        if !self.is_root() {
            return Err(SpecError::NotRoot {
                description: self.description(),
            });
        }

        self.run_group(&Arc::new(Bindings::default()), &[], options)?;
        let lines = self.results();

        if !options.muted {
            for line in &lines {
                println!("{line}");
            }
        }
        if let Some(bus) = self.bus() {
            emit(&bus, SpecEvent::TestGroupResults(lines.clone()))?;
        }
        Ok(lines)
    }

    /// Count `(tests, failed)` over this group and every nested group
    pub fn tally(&self) -> (usize, usize) {
        let (children, tests) = {
            let state = self.inner.lock();
            (state.children.clone(), state.tests.clone())
        };
        let own_failed = tests.iter().filter(|t| t.result().is_fail()).count();
        children
            .iter()
            .map(Describe::tally)
            .fold((tests.len(), own_failed), |(n, f), (cn, cf)| (n + cn, f + cf))
    }

    /// Run with inherited state, returning this group's report lines.
    fn run_group(
        &self,
        inherited: &Arc<Bindings>,
        parent_path: &[String],
        options: RunOptions,
    ) -> Result<Vec<ReportLine>, SpecError> {
        let (description, depth, children, tests, lets, befores) = {
            let mut state = self.inner.lock();
            if state.phase == Phase::Running {
                return Err(SpecError::AlreadyRunning {
                    description: state.description.clone(),
                });
            }
            state.phase = Phase::Running;
            (
                state.description.clone(),
                state.depth,
                state.children.clone(),
                state.tests.clone(),
                state.lets.clone(),
                state.befores.clone(),
            )
        };

        let mut path = parent_path.to_vec();
        path.push(description.clone());
        let bindings = Arc::new(Bindings::layer(inherited, &lets, &befores));

        let mut body = Vec::new();
        let mut any_tests = false;
        let mut all_passed = true;

        for child in &children {
            match child.run_group(&bindings, &path, options) {
                Ok(lines) => body.extend(lines),
                Err(e) => {
                    self.inner.lock().phase = Phase::Declared;
                    return Err(e);
                }
            }
            if let Some(passed) = child.passed() {
                any_tests = true;
                all_passed &= passed;
            }
        }

        let mut scope = Scope::new(path, bindings);
        for test in &tests {
            let result = test.run_in(&mut scope);
            any_tests = true;
            all_passed &= result.is_pass();
            body.extend(test_lines(depth, &test.description(), &result, options));
        }

        let passed = any_tests && all_passed;
        let mut report = Vec::with_capacity(body.len() + 1);
        report.push(ReportLine::new(depth, LineKind::Group { description, passed }));
        report.extend(body);

        let mut state = self.inner.lock();
        state.report = report.clone();
        state.passed = any_tests.then_some(all_passed);
        state.phase = Phase::Reported;
        Ok(report)
    }

    fn define_let(&self, name: String, provider: Provider) -> &Self {
        {
            let mut state = self.inner.lock();
            state.befores.retain(|(n, _)| n != &name);
            upsert(&mut state.lets, name, provider);
        }
        self
    }

    fn define_before(&self, name: String, provider: Provider) -> &Self {
        {
            let mut state = self.inner.lock();
            state.lets.retain(|(n, _)| n != &name);
            upsert(&mut state.befores, name, provider);
        }
        self
    }

    /// Handle identity
    pub fn same_group(&self, other: &Describe) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Describe {
    fn eq(&self, other: &Self) -> bool {
        self.same_group(other)
    }
}

impl std::fmt::Debug for Describe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Describe")
            .field("description", &state.description)
            .field("depth", &state.depth)
            .field("children", &state.children.len())
            .field("tests", &state.tests.len())
            .field("phase", &state.phase)
            .finish_non_exhaustive()
    }
}

fn upsert(entries: &mut Vec<(String, Provider)>, name: String, provider: Provider) {
    match entries.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = provider,
        None => entries.push((name, provider)),
    }
}

fn test_lines(
    depth: usize,
    description: &str,
    result: &TestResult,
    options: RunOptions,
) -> Vec<ReportLine> {
    let line = |kind| ReportLine::new(depth, kind);
    if result.is_pass() {
        if options.verbose {
            return vec![line(LineKind::Passed {
                description: description.to_string(),
            })];
        }
        return Vec::new();
    }

    let mut lines = vec![
        line(LineKind::Failed {
            description: description.to_string(),
        }),
        line(LineKind::TraceHeader),
    ];
    let trace = result.stack_trace.clone().unwrap_or_default();
    if let Some((last, frames)) = trace.split_last() {
        lines.extend(
            frames
                .iter()
                .map(|text| line(LineKind::TraceFrame { text: text.clone() })),
        );
        lines.push(line(LineKind::TraceError { text: last.clone() }));
    }
    lines
}

#[cfg(test)]
#[path = "describe_tests.rs"]
mod tests;
