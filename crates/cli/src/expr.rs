// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Expressions embedded in spec files.
//!
//! Plain JSON/TOML values are literals: arrays become lists and tables
//! become maps. A table with a `$`-prefixed key is an operator and must have
//! exactly that one key:
//!
//! | operator  | argument                          | result                          |
//! |-----------|-----------------------------------|---------------------------------|
//! | `$ref`    | name                              | shared value from the scope     |
//! | `$set`    | `[name, expr]`                    | stores and returns the value    |
//! | `$do`     | `[expr, ...]`                     | last value                      |
//! | `$add` `$sub` `$mul` `$div` | `[expr, expr, ...]` | left fold                   |
//! | `$len`    | expr                              | length as int                   |
//! | `$list`   | expr                              | elements of an iterable         |
//! | `$attr`   | `[expr, name]`                    | member of an object             |
//! | `$raise`  | `{kind, message}`                 | raises                          |
//! | `$type`   | type name                         | type token for `be_a`           |
//! | `$error`  | error kind name                   | error token for `raise_error`   |
//! | `$object` | `{class, attrs, methods}`         | new object                      |
//! | `$fn`     | `{name, params, body}`            | function value                  |
//! | `$call`   | `{name, args, on}`                | calls a function or method      |
//! | `$random` | `"int"` or `"float"`              | random number                   |
//! | `$nil`    | anything                          | nil                             |

use serde_json::{Map as JsonMap, Value as JsonValue};
use spectacle_core::{ErrorKind, Object, Raised, Scope, Value, ValueType};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Malformed expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("operator '{op}' must be the only key in its table")]
    MixedTable { op: String },

    #[error("operator '{op}' expects {expected}")]
    Malformed { op: String, expected: &'static str },

    #[error("operator '{op}' does not take a '{field}' field")]
    UnknownField { op: String, field: String },
}

fn malformed(op: &str, expected: &'static str) -> ExprError {
    ExprError::Malformed {
        op: op.to_string(),
        expected,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    fn apply(self, lhs: &Value, rhs: &Value) -> Result<Value, Raised> {
        match self {
            Self::Add => lhs.add(rhs),
            Self::Sub => lhs.sub(rhs),
            Self::Mul => lhs.mul(rhs),
            Self::Div => lhs.div(rhs),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RandomKind {
    Int,
    Float,
}

/// A compiled expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Value),
    List(Vec<Expr>),
    Map(BTreeMap<String, Expr>),
    Ref(String),
    Set(String, Box<Expr>),
    Do(Vec<Expr>),
    Arith(ArithOp, Vec<Expr>),
    Len(Box<Expr>),
    ToList(Box<Expr>),
    Attr(Box<Expr>, String),
    Raise {
        kind: ErrorKind,
        message: String,
    },
    Object {
        class: String,
        attrs: BTreeMap<String, Expr>,
        methods: BTreeMap<String, Expr>,
    },
    Function {
        name: String,
        params: Vec<String>,
        body: Arc<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        on: Option<Box<Expr>>,
    },
    Random(RandomKind),
}

impl Expr {
    /// Compile a raw document value
    pub fn parse(raw: &JsonValue) -> Result<Self, ExprError> {
        match raw {
            JsonValue::Null => Ok(Self::Literal(Value::Nil)),
            JsonValue::Bool(b) => Ok(Self::Literal(Value::Bool(*b))),
            JsonValue::Number(n) => Ok(Self::Literal(match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            })),
            JsonValue::String(s) => Ok(Self::Literal(Value::Str(s.clone()))),
            JsonValue::Array(items) => items
                .iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            JsonValue::Object(table) => {
                let Some(op) = table.keys().find(|k| k.starts_with('$')) else {
                    return table
                        .iter()
                        .map(|(k, v)| Self::parse(v).map(|e| (k.clone(), e)))
                        .collect::<Result<BTreeMap<_, _>, _>>()
                        .map(Self::Map);
                };
                if table.len() != 1 {
                    return Err(ExprError::MixedTable { op: op.clone() });
                }
                match table.get(op) {
                    Some(arg) => Self::operator(op, arg),
                    None => Err(ExprError::MixedTable { op: op.clone() }),
                }
            }
        }
    }

    fn operator(op: &str, arg: &JsonValue) -> Result<Self, ExprError> {
        match op {
            "$ref" => Ok(Self::Ref(string(op, arg)?)),
            "$set" => match arg.as_array().map(Vec::as_slice) {
                Some([name, value]) => {
                    Ok(Self::Set(string(op, name)?, Box::new(Self::parse(value)?)))
                }
                _ => Err(malformed(op, "[name, expr]")),
            },
            "$do" => Ok(Self::Do(operands(op, arg, 1)?)),
            "$add" => Ok(Self::Arith(ArithOp::Add, operands(op, arg, 2)?)),
            "$sub" => Ok(Self::Arith(ArithOp::Sub, operands(op, arg, 2)?)),
            "$mul" => Ok(Self::Arith(ArithOp::Mul, operands(op, arg, 2)?)),
            "$div" => Ok(Self::Arith(ArithOp::Div, operands(op, arg, 2)?)),
            "$len" => Ok(Self::Len(Box::new(Self::parse(arg)?))),
            "$list" => Ok(Self::ToList(Box::new(Self::parse(arg)?))),
            "$attr" => match arg.as_array().map(Vec::as_slice) {
                Some([target, name]) => {
                    Ok(Self::Attr(Box::new(Self::parse(target)?), string(op, name)?))
                }
                _ => Err(malformed(op, "[expr, name]")),
            },
            "$raise" => {
                let fields = fields(op, arg, &["kind", "message"])?;
                let kind = fields.get("kind").ok_or_else(|| malformed(op, "a 'kind' field"))?;
                let message = match fields.get("message") {
                    Some(m) => string(op, m)?,
                    None => String::new(),
                };
                Ok(Self::Raise {
                    kind: ErrorKind::new(string(op, kind)?),
                    message,
                })
            }
            "$type" => {
                let name = string(op, arg)?;
                let value_type: ValueType = match name.parse() {
                    Ok(t) => t,
                    Err(never) => match never {},
                };
                Ok(Self::Literal(Value::Type(value_type)))
            }
            "$error" => Ok(Self::Literal(Value::Error(ErrorKind::new(string(op, arg)?)))),
            "$object" => {
                let fields = fields(op, arg, &["class", "attrs", "methods"])?;
                let class = match fields.get("class") {
                    Some(c) => string(op, c)?,
                    None => "Object".to_string(),
                };
                Ok(Self::Object {
                    class,
                    attrs: members(op, fields.get("attrs"))?,
                    methods: members(op, fields.get("methods"))?,
                })
            }
            "$fn" => {
                let fields = fields(op, arg, &["name", "params", "body"])?;
                let name = match fields.get("name") {
                    Some(n) => string(op, n)?,
                    None => "fn".to_string(),
                };
                let params = match fields.get("params") {
                    Some(JsonValue::Array(names)) => names
                        .iter()
                        .map(|n| string(op, n))
                        .collect::<Result<Vec<_>, _>>()?,
                    Some(_) => return Err(malformed(op, "a list of parameter names")),
                    None => Vec::new(),
                };
                let body = fields.get("body").ok_or_else(|| malformed(op, "a 'body' field"))?;
                Ok(Self::Function {
                    name,
                    params,
                    body: Arc::new(Self::parse(body)?),
                })
            }
            "$call" => {
                let fields = fields(op, arg, &["name", "args", "on"])?;
                let name = fields.get("name").ok_or_else(|| malformed(op, "a 'name' field"))?;
                let args = match fields.get("args") {
                    Some(a) => operands(op, a, 0)?,
                    None => Vec::new(),
                };
                let on = fields.get("on").map(Self::parse).transpose()?.map(Box::new);
                Ok(Self::Call {
                    name: string(op, name)?,
                    args,
                    on,
                })
            }
            "$random" => match arg.as_str() {
                Some("int") => Ok(Self::Random(RandomKind::Int)),
                Some("float") => Ok(Self::Random(RandomKind::Float)),
                _ => Err(malformed(op, "\"int\" or \"float\"")),
            },
            "$nil" => Ok(Self::Literal(Value::Nil)),
            other => Err(ExprError::UnknownOperator(other.to_string())),
        }
    }

    /// The value of a constant expression, if it is one
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(v) => Some(v),
            _ => None,
        }
    }

    /// Evaluate against a test's scope
    pub fn eval(&self, scope: &mut Scope) -> Result<Value, Raised> {
        match self {
            Self::Literal(v) => Ok(v.clone()),
            Self::List(items) => eval_all(items, scope).map(Value::List),
            Self::Map(entries) => entries
                .iter()
                .map(|(k, e)| e.eval(scope).map(|v| (k.clone(), v)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Value::Map),
            Self::Ref(name) => scope.get(name),
            Self::Set(name, expr) => {
                let value = expr.eval(scope)?;
                scope.set(name.clone(), value.clone());
                Ok(value)
            }
            Self::Do(steps) => {
                let mut last = Value::Nil;
                for step in steps {
                    last = step.eval(scope)?;
                }
                Ok(last)
            }
            Self::Arith(op, operands) => {
                let Some((first, rest)) = operands.split_first() else {
                    return Ok(Value::Nil);
                };
                let mut acc = first.eval(scope)?;
                for operand in rest {
                    let rhs = operand.eval(scope)?;
                    acc = op.apply(&acc, &rhs)?;
                }
                Ok(acc)
            }
            Self::Len(expr) => {
                let len = expr.eval(scope)?.len()?;
                Ok(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
            }
            Self::ToList(expr) => to_list(expr.eval(scope)?),
            Self::Attr(target, name) => target.eval(scope)?.get_attr(name),
            Self::Raise { kind, message } => Err(Raised::new(kind.clone(), message.clone())),
            Self::Object { class, attrs, methods } => {
                let mut object = Object::new(class.clone());
                for (name, expr) in attrs {
                    object = object.with_attr(name.clone(), expr.eval(scope)?);
                }
                for (name, expr) in methods {
                    let returned = expr.eval(scope)?;
                    object = object.with_method(name.clone(), move |_| Ok(returned.clone()));
                }
                Ok(Value::Object(object))
            }
            Self::Function { name, params, body } => Ok(function(name, params, body)),
            Self::Call { name, args, on } => {
                let callee = match on {
                    Some(target) => target.eval(scope)?.get_attr(name)?,
                    None => scope.get(name)?,
                };
                let args = eval_all(args, scope)?;
                callee.call(&args)
            }
            Self::Random(RandomKind::Int) => Ok(Value::Int(fastrand::i64(..))),
            Self::Random(RandomKind::Float) => Ok(Value::Float(fastrand::f64())),
        }
    }
}

fn eval_all(exprs: &[Expr], scope: &mut Scope) -> Result<Vec<Value>, Raised> {
    exprs.iter().map(|e| e.eval(scope)).collect()
}

/// A function whose body runs in a fresh scope holding only its parameters
fn function(name: &str, params: &[String], body: &Arc<Expr>) -> Value {
    let label = name.to_string();
    let params = params.to_vec();
    let body = Arc::clone(body);
    Value::function(name, move |args: &[Value]| {
        if args.len() != params.len() {
            return Err(Raised::type_error(format!(
                "{label}() takes {} arguments but {} were given",
                params.len(),
                args.len()
            )));
        }
        let mut locals = Scope::detached();
        for (param, arg) in params.iter().zip(args) {
            locals.set(param.clone(), arg.clone());
        }
        body.eval(&mut locals)
    })
}

fn to_list(value: Value) -> Result<Value, Raised> {
    match value {
        Value::List(items) => Ok(Value::List(items)),
        Value::Str(s) => Ok(Value::List(s.chars().map(|c| Value::Str(c.to_string())).collect())),
        Value::Map(map) => Ok(Value::List(map.into_keys().map(Value::Str).collect())),
        other => Err(Raised::type_error(format!(
            "'{}' object is not iterable",
            other.type_of()
        ))),
    }
}

fn string(op: &str, raw: &JsonValue) -> Result<String, ExprError> {
    raw.as_str()
        .map(str::to_string)
        .ok_or_else(|| malformed(op, "a string"))
}

fn operands(op: &str, raw: &JsonValue, at_least: usize) -> Result<Vec<Expr>, ExprError> {
    let expected = match at_least {
        0 => "a list of expressions",
        1 => "a non-empty list of expressions",
        _ => "a list of at least two expressions",
    };
    match raw.as_array() {
        Some(items) if items.len() >= at_least => items.iter().map(Expr::parse).collect(),
        _ => Err(malformed(op, expected)),
    }
}

fn fields<'a>(
    op: &str,
    raw: &'a JsonValue,
    allowed: &[&str],
) -> Result<&'a JsonMap<String, JsonValue>, ExprError> {
    let table = raw.as_object().ok_or_else(|| malformed(op, "a table"))?;
    if let Some(field) = table.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ExprError::UnknownField {
            op: op.to_string(),
            field: field.clone(),
        });
    }
    Ok(table)
}

fn members(op: &str, raw: Option<&JsonValue>) -> Result<BTreeMap<String, Expr>, ExprError> {
    match raw {
        None => Ok(BTreeMap::new()),
        Some(JsonValue::Object(table)) => table
            .iter()
            .map(|(k, v)| Expr::parse(v).map(|e| (k.clone(), e)))
            .collect(),
        Some(_) => Err(malformed(op, "a table of members")),
    }
}

#[cfg(test)]
#[path = "expr_tests.rs"]
mod tests;
