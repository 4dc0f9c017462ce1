// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state visible to a running test.
//!
//! Each group layers its own `let` and `before` definitions over those it
//! inherits. The nearest definition of a name decides how it behaves:
//! `let` values are produced once per group run and cached by the group that
//! defines them, `before` values are produced again before every test.

use crate::raised::{ErrorKind, Raised};
use crate::value::Value;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Deferred computation run against a scope.
pub type Producer = Arc<dyn Fn(&mut Scope) -> Result<Value, Raised> + Send + Sync>;

/// Source of a shared value: fixed, or produced on demand.
#[derive(Clone)]
pub(crate) enum Provider {
    Value(Value),
    Producer(Producer),
}

impl Provider {
    fn provide(&self, scope: &mut Scope) -> Result<Value, Raised> {
        match self {
            Self::Value(v) => Ok(v.clone()),
            Self::Producer(p) => p(scope),
        }
    }
}

/// Memo of one `let` for one run of the group that defines it.
type LetSlot = Arc<Mutex<Option<Value>>>;

#[derive(Clone)]
enum Binding {
    Let(LetSlot),
    Before,
}

impl Binding {
    fn label(&self) -> &'static str {
        match self {
            Self::Let(_) => "let",
            Self::Before => "before",
        }
    }
}

/// Definitions visible from one group, flattened over its ancestors.
///
/// Layering creates fresh `let` slots for the group's own definitions and
/// shares the inherited ones, so a descendant reads the value its ancestor
/// cached.
#[derive(Clone, Default)]
pub(crate) struct Bindings {
    nearest: HashMap<String, (Binding, Provider)>,
    /// Before names in evaluation order, outermost group first
    before_order: Vec<String>,
}

impl Bindings {
    /// Layer one group's definitions over inherited ones
    pub(crate) fn layer(
        inherited: &Bindings,
        lets: &[(String, Provider)],
        befores: &[(String, Provider)],
    ) -> Self {
        let mut layered = inherited.clone();
        for (name, provider) in lets {
            let slot = Arc::new(Mutex::new(None));
            layered
                .nearest
                .insert(name.clone(), (Binding::Let(slot), provider.clone()));
        }
        for (name, provider) in befores {
            layered
                .nearest
                .insert(name.clone(), (Binding::Before, provider.clone()));
            layered.before_order.retain(|n| n != name);
            layered.before_order.push(name.clone());
        }
        let nearest = &layered.nearest;
        layered
            .before_order
            .retain(|n| matches!(nearest.get(n), Some((Binding::Before, _))));
        layered
    }

    fn lookup(&self, name: &str) -> Option<(Binding, Provider)> {
        self.nearest.get(name).cloned()
    }
}

/// A test's view of inherited shared state.
pub struct Scope {
    path: Vec<String>,
    bindings: Arc<Bindings>,
    befores: HashMap<String, Value>,
    locals: HashMap<String, Value>,
    resolving: Vec<String>,
}

impl Scope {
    /// A scope with no shared state, used by tests run outside a group
    pub fn detached() -> Self {
        Self::new(Vec::new(), Arc::new(Bindings::default()))
    }

    pub(crate) fn new(path: Vec<String>, bindings: Arc<Bindings>) -> Self {
        Self {
            path,
            bindings,
            befores: HashMap::new(),
            locals: HashMap::new(),
            resolving: Vec::new(),
        }
    }

    /// Descriptions of the enclosing groups, outermost first
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Whether `name` resolves to anything
    pub fn has(&self, name: &str) -> bool {
        self.locals.contains_key(name) || self.bindings.nearest.contains_key(name)
    }

    /// Read a shared value, producing it if needed.
    pub fn get(&mut self, name: &str) -> Result<Value, Raised> {
        if let Some(value) = self.locals.get(name) {
            return Ok(value.clone());
        }
        let Some((binding, provider)) = self.bindings.lookup(name) else {
            return Err(Raised::attribute(format!("No such attribute: {name}")).as_misuse());
        };

        let cached = match &binding {
            Binding::Let(slot) => slot.lock().clone(),
            Binding::Before => self.befores.get(name).cloned(),
        };
        if let Some(value) = cached {
            return Ok(value);
        }

        let value = self.produce(name, &binding, &provider)?;
        self.store(&binding, name, value.clone());
        Ok(value)
    }

    /// Write a value under `name`.
    ///
    /// A `let` name keeps the new value for the rest of the defining group's
    /// run, descendants included. A `before` name keeps it until the next
    /// test. Any other name becomes a local of the current test.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.bindings.lookup(&name) {
            Some((binding, _)) => self.store(&binding, &name, value),
            None => {
                self.locals.insert(name, value);
            }
        }
    }

    /// Reset per-test state and produce every `before` value afresh.
    pub(crate) fn prepare_befores(&mut self) -> Result<(), Raised> {
        self.befores.clear();
        self.locals.clear();
        // a panicking producer never pops its name
        self.resolving.clear();
        let order = self.bindings.before_order.clone();
        for name in order {
            if !self.befores.contains_key(&name) {
                self.get(&name)?;
            }
        }
        Ok(())
    }

    fn produce(&mut self, name: &str, binding: &Binding, provider: &Provider) -> Result<Value, Raised> {
        if self.resolving.iter().any(|n| n == name) {
            let mut cycle = self.resolving.clone();
            cycle.push(name.to_string());
            return Err(Raised::new(
                ErrorKind::RECURSION,
                format!("circular reference: {}", cycle.join(" -> ")),
            ));
        }

        self.resolving.push(name.to_string());
        let produced = provider.provide(self);
        self.resolving.pop();

        produced.map_err(|err| err.within(format!("in {} '{}'", binding.label(), name)))
    }

    fn store(&mut self, binding: &Binding, name: &str, value: Value) {
        match binding {
            Binding::Let(slot) => *slot.lock() = Some(value),
            Binding::Before => {
                self.befores.insert(name.to_string(), value);
            }
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("path", &self.path)
            .field("befores", &self.befores)
            .field("locals", &self.locals)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
