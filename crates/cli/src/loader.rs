// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Turns spec files into registered test groups.
//!
//! Loading happens in two phases. [`compile`] checks the whole document and
//! fails on the first malformed expression, so a broken file never leaves
//! half its groups on the bus. [`register`] then declares the groups.
//!
//! Problems that only concern a single test (no `expect`, no strategy, an
//! unknown strategy name, both `to` and `not_to`) are not load errors: the
//! test is declared as written and fails with a usage error when it runs.

use crate::expr::Expr;
use crate::spec_file::{GroupSpec, LoadError, SpecFile, TestSpec};
use serde_json::Value as JsonValue;
use spectacle_core::{describe, Describe, Scope, SpecBus, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A group whose expressions have all been compiled.
#[derive(Clone, Debug)]
pub struct CompiledGroup {
    pub name: String,
    pub lets: Vec<(String, Expr)>,
    pub befores: Vec<(String, Expr)>,
    pub tests: Vec<CompiledTest>,
    pub children: Vec<CompiledGroup>,
}

#[derive(Clone, Debug)]
pub struct CompiledTest {
    pub name: String,
    pub expect: Option<Expr>,
    pub to: Option<String>,
    pub not_to: Option<String>,
    /// Expected values, evaluated once at load time
    pub args: Vec<Value>,
}

/// Compile every group of a parsed document
pub fn compile(file: &SpecFile, path: &Path) -> Result<Vec<CompiledGroup>, LoadError> {
    let mut ctx = Context {
        path,
        trail: Vec::new(),
    };
    file.describe.iter().map(|g| ctx.group(g)).collect()
}

/// Read and compile a spec file
pub fn compile_file(path: &Path) -> Result<Vec<CompiledGroup>, LoadError> {
    let file = SpecFile::load(path)?;
    compile(&file, path)
}

/// Declare compiled groups on `bus`; returns the root groups
pub fn register(bus: &SpecBus, groups: &[CompiledGroup]) -> Result<Vec<Describe>, LoadError> {
    groups
        .iter()
        .map(|compiled| {
            let root = describe(bus, compiled.name.clone()).map_err(|source| LoadError::Register {
                name: compiled.name.clone(),
                source,
            })?;
            declare(&root, compiled);
            Ok(root)
        })
        .collect()
}

/// Declare a compiled group without a bus
pub fn build(compiled: &CompiledGroup) -> Describe {
    let group = Describe::new(compiled.name.clone());
    declare(&group, compiled);
    group
}

fn declare(group: &Describe, compiled: &CompiledGroup) {
    for (name, expr) in &compiled.lets {
        match expr.as_literal() {
            Some(value) => group.let_value(name.clone(), value.clone()),
            None => {
                let expr = Arc::new(expr.clone());
                group.let_fn(name.clone(), move |scope: &mut Scope| expr.eval(scope))
            }
        };
    }
    for (name, expr) in &compiled.befores {
        match expr.as_literal() {
            Some(value) => group.before_value(name.clone(), value.clone()),
            None => {
                let expr = Arc::new(expr.clone());
                group.before_fn(name.clone(), move |scope: &mut Scope| expr.eval(scope))
            }
        };
    }
    for spec in &compiled.tests {
        let test = group.it(spec.name.clone());
        if let Some(expr) = &spec.expect {
            let expr = Arc::new(expr.clone());
            test.expect(move |scope: &mut Scope| expr.eval(scope));
        }
        if let Some(strategy) = &spec.to {
            test.to_named(strategy, spec.args.clone());
        }
        if let Some(strategy) = &spec.not_to {
            test.to_not_named(strategy, spec.args.clone());
        }
    }
    for child in &compiled.children {
        declare(&group.describe(child.name.clone()), child);
    }
}

struct Context<'a> {
    path: &'a Path,
    trail: Vec<String>,
}

impl Context<'_> {
    fn group(&mut self, spec: &GroupSpec) -> Result<CompiledGroup, LoadError> {
        self.trail.push(format!("describe \"{}\"", spec.name));
        let compiled = self.group_body(spec);
        self.trail.pop();
        compiled
    }

    fn group_body(&mut self, spec: &GroupSpec) -> Result<CompiledGroup, LoadError> {
        Ok(CompiledGroup {
            name: spec.name.clone(),
            lets: self.definitions("let", &spec.lets)?,
            befores: self.definitions("before", &spec.before)?,
            tests: spec.it.iter().map(|t| self.test(t)).collect::<Result<_, _>>()?,
            children: spec.describe.iter().map(|g| self.group(g)).collect::<Result<_, _>>()?,
        })
    }

    fn definitions<'s>(
        &self,
        label: &str,
        raw: impl IntoIterator<Item = (&'s String, &'s JsonValue)>,
    ) -> Result<Vec<(String, Expr)>, LoadError> {
        raw.into_iter()
            .map(|(name, value)| {
                self.expr(&format!("{label} '{name}'"), value)
                    .map(|expr| (name.clone(), expr))
            })
            .collect()
    }

    fn test(&self, spec: &TestSpec) -> Result<CompiledTest, LoadError> {
        let here = format!("it \"{}\"", spec.name);
        let expect = spec
            .expect
            .as_ref()
            .map(|raw| self.expr(&format!("{here}: expect"), raw))
            .transpose()?;

        let mut args = Vec::with_capacity(spec.args.len());
        let mut scope = Scope::detached();
        for (i, raw) in spec.args.iter().enumerate() {
            let location = format!("{here}: args[{i}]");
            let value = self
                .expr(&location, raw)?
                .eval(&mut scope)
                .map_err(|raised| LoadError::Args {
                    path: self.path_buf(),
                    location: self.locate(&location),
                    raised,
                })?;
            args.push(value);
        }

        Ok(CompiledTest {
            name: spec.name.clone(),
            expect,
            to: spec.to.clone(),
            not_to: spec.not_to.clone(),
            args,
        })
    }

    fn expr(&self, location: &str, raw: &JsonValue) -> Result<Expr, LoadError> {
        Expr::parse(raw).map_err(|source| LoadError::Expression {
            path: self.path_buf(),
            location: self.locate(location),
            source,
        })
    }

    fn locate(&self, leaf: &str) -> String {
        let mut parts = self.trail.clone();
        parts.push(leaf.to_string());
        parts.join(" > ")
    }

    fn path_buf(&self) -> PathBuf {
        self.path.to_path_buf()
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
