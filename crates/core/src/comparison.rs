// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Comparison strategies.
//!
//! A [`Comparison`] pairs a [`Strategy`] with its expected arguments and
//! judges the value (or error) a producer yields. Judging never raises: the
//! verdict comes back as an [`Outcome`].

use crate::error::UnknownStrategy;
use crate::raised::{ErrorKind, Raised};
use crate::value::{Value, ValueType};
use std::fmt;
use std::str::FromStr;

/// The closed catalog of comparison strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Eq,
    RaiseError,
    BeA,
    Include,
    BeEmpty,
    HaveKeys,
    HaveAttributes,
    HaveMethods,
}

impl Strategy {
    pub const ALL: [Strategy; 8] = [
        Strategy::Eq,
        Strategy::RaiseError,
        Strategy::BeA,
        Strategy::Include,
        Strategy::BeEmpty,
        Strategy::HaveKeys,
        Strategy::HaveAttributes,
        Strategy::HaveMethods,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::RaiseError => "raise_error",
            Self::BeA => "be_a",
            Self::Include => "include",
            Self::BeEmpty => "be_empty",
            Self::HaveKeys => "have_keys",
            Self::HaveAttributes => "have_attributes",
            Self::HaveMethods => "have_methods",
        }
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verdict of a comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The actual value satisfied the strategy
    Pass,
    /// The actual value did not satisfy the strategy, or the code under test raised
    Fail(Raised),
    /// The comparison could not be applied; negation never turns this into a pass
    Misuse(Raised),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// A strategy bound to its expected arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    strategy: Strategy,
    expected: Vec<Value>,
}

impl Comparison {
    pub fn new(strategy: Strategy, expected: Vec<Value>) -> Self {
        Self { strategy, expected }
    }

    /// Bind a strategy by name
    pub fn named(name: &str, expected: Vec<Value>) -> Result<Self, UnknownStrategy> {
        Ok(Self::new(name.parse()?, expected))
    }

    pub fn eq(expected: impl Into<Value>) -> Self {
        Self::new(Strategy::Eq, vec![expected.into()])
    }

    pub fn raise_error(kind: ErrorKind) -> Self {
        Self::new(Strategy::RaiseError, vec![Value::Error(kind)])
    }

    pub fn be_a(value_type: ValueType) -> Self {
        Self::new(Strategy::BeA, vec![Value::Type(value_type)])
    }

    pub fn include<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(Strategy::Include, items.into_iter().map(Into::into).collect())
    }

    pub fn be_empty() -> Self {
        Self::new(Strategy::BeEmpty, Vec::new())
    }

    pub fn have_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Strategy::HaveKeys, strings(keys))
    }

    pub fn have_attributes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Strategy::HaveAttributes, strings(names))
    }

    pub fn have_methods<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Strategy::HaveMethods, strings(names))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn expected(&self) -> &[Value] {
        &self.expected
    }

    /// Judge the value produced by `actual`.
    ///
    /// The expected arguments are validated before `actual` is invoked.
    pub fn evaluate(&self, actual: &mut dyn FnMut() -> Result<Value, Raised>) -> Outcome {
        if let Err(err) = self.validate() {
            return Outcome::Misuse(err);
        }

        if self.strategy == Strategy::RaiseError {
            return self.judge_raised(actual());
        }

        match actual() {
            Ok(value) => self.judge(&value),
            Err(err) if err.is_misuse() => {
                Outcome::Misuse(err.within("while evaluating the actual value"))
            }
            Err(err) => Outcome::Fail(err.within("while evaluating the actual value")),
        }
    }

    fn validate(&self) -> Result<(), Raised> {
        let name = self.strategy.name();
        let n = self.expected.len();
        match self.strategy {
            Strategy::Eq if n != 1 => Err(Raised::usage(format!(
                "{name} expects exactly one argument, got {n}"
            ))),
            Strategy::RaiseError | Strategy::BeA if n != 1 => Err(Raised::usage(format!(
                "{name} expects exactly one argument, got {n}"
            ))),
            Strategy::RaiseError => match &self.expected[0] {
                Value::Error(_) => Ok(()),
                other => Err(Raised::usage(format!(
                    "{name} expects an error kind, got {other}"
                ))),
            },
            Strategy::BeA => match &self.expected[0] {
                Value::Type(_) => Ok(()),
                other => Err(Raised::usage(format!("{name} expects a type, got {other}"))),
            },
            Strategy::BeEmpty if n != 0 => Err(Raised::usage(format!(
                "{name} takes no arguments, got {n}"
            ))),
            Strategy::Include | Strategy::HaveKeys | Strategy::HaveAttributes | Strategy::HaveMethods
                if n == 0 =>
            {
                Err(Raised::usage(format!("{name} expects at least one argument")))
            }
            Strategy::HaveKeys | Strategy::HaveAttributes | Strategy::HaveMethods => {
                match self.expected.iter().find(|v| v.as_str().is_none()) {
                    Some(other) => Err(Raised::usage(format!(
                        "{name} expects names as strings, got {other}"
                    ))),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    fn judge_raised(&self, result: Result<Value, Raised>) -> Outcome {
        let Some(expected) = self.expected.first().and_then(Value::as_error_kind) else {
            return Outcome::Misuse(Raised::usage("raise_error expects an error kind"));
        };
        match result {
            Ok(value) => Outcome::Fail(Raised::assertion(format!(
                "No error was raised, instead got {value}"
            ))),
            Err(err) if expected.matches(err.kind()) => Outcome::Pass,
            Err(err) if err.is_misuse() => Outcome::Misuse(err),
            Err(err) => Outcome::Fail(Raised::assertion(format!(
                "expected {}, but got {}: {}",
                expected,
                err.kind(),
                err.message()
            ))),
        }
    }

    fn judge(&self, actual: &Value) -> Outcome {
        match self.strategy {
            Strategy::Eq => {
                let expected = &self.expected[0];
                check(
                    actual == expected,
                    format!("expected {}, but got {}", display_nested(expected), display_nested(actual)),
                )
            }
            Strategy::BeA => {
                let actual_type = actual.type_of();
                match self.expected[0].as_type() {
                    Some(expected) => check(
                        &actual_type == expected,
                        format!("expected {expected}, but got {actual_type}"),
                    ),
                    None => Outcome::Misuse(Raised::usage("be_a expects a type")),
                }
            }
            Strategy::Include => self.judge_include(actual),
            Strategy::BeEmpty => match actual.len() {
                Ok(len) => check(
                    len == 0,
                    format!("expected an empty iterable, but got {}", display_nested(actual)),
                ),
                Err(_) => not_iterable(),
            },
            Strategy::HaveKeys => match actual.as_map() {
                Some(map) => {
                    let missing = self.missing(|key| map.contains_key(key));
                    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    check(
                        missing.is_empty(),
                        format!("expected keys {}, but got {}", list(&missing), list(&keys)),
                    )
                }
                None => Outcome::Misuse(Raised::type_error(
                    "the result of the test is not a dictionary",
                )),
            },
            Strategy::HaveAttributes | Strategy::HaveMethods => {
                let Some(object) = actual.as_object() else {
                    return Outcome::Misuse(Raised::type_error(
                        "the result of the test is not an object",
                    ));
                };
                let (what, missing) = if self.strategy == Strategy::HaveMethods {
                    ("methods", self.missing(|name| object.has_method(name)))
                } else {
                    ("attributes", self.missing(|name| object.has_member(name)))
                };
                let names = object.member_names();
                check(
                    missing.is_empty(),
                    format!("expected {} {}, but got {}", what, list(&missing), list(&names)),
                )
            }
            Strategy::RaiseError => {
                Outcome::Misuse(Raised::usage("raise_error judges errors, not values"))
            }
        }
    }

    fn judge_include(&self, actual: &Value) -> Outcome {
        if !actual.is_iterable() {
            return not_iterable();
        }
        let mut missing = Vec::new();
        for item in &self.expected {
            match actual.contains(item) {
                Ok(true) => {}
                Ok(false) => missing.push(item.clone()),
                Err(err) => return Outcome::Misuse(err),
            }
        }
        check(
            missing.is_empty(),
            format!(
                "expected {} to be included, missing {}, but got {}",
                Value::List(self.expected.clone()),
                Value::List(missing),
                display_nested(actual)
            ),
        )
    }

    /// Expected names for which `present` is false
    fn missing(&self, present: impl Fn(&str) -> bool) -> Vec<&str> {
        self.expected
            .iter()
            .filter_map(Value::as_str)
            .filter(|name| !present(name))
            .collect()
    }
}

fn strings<I, S>(items: I) -> Vec<Value>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(|s| Value::Str(s.into())).collect()
}

fn check(passed: bool, diagnostic: String) -> Outcome {
    if passed {
        Outcome::Pass
    } else {
        Outcome::Fail(Raised::assertion(diagnostic))
    }
}

fn not_iterable() -> Outcome {
    Outcome::Misuse(Raised::type_error("the result of the test is not an iterable"))
}

/// Top-level values render bare; diagnostics quote strings so `'1'` and `1` differ
fn display_nested(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

fn list<S: AsRef<str>>(names: &[S]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
#[path = "comparison_tests.rs"]
mod tests;
