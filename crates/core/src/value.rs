// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Dynamic values passed between producers, shared state and comparisons.

use crate::raised::{ErrorKind, Raised};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

type NativeFn = dyn Fn(&[Value]) -> Result<Value, Raised> + Send + Sync;

/// A named callable value.
///
/// Two functions are equal only when they are the same function.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    call: Arc<NativeFn>,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Raised> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            call: Arc::new(call),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, Raised> {
        (self.call)(args)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.call), Arc::as_ptr(&other.call))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

#[derive(Clone, Debug)]
struct ObjectInner {
    class: String,
    members: BTreeMap<String, Value>,
}

/// An instance of a named class with named members.
///
/// Cloning an object yields another reference to the same instance.
/// Equality is identity.
#[derive(Clone, Debug)]
pub struct Object(Arc<ObjectInner>);

impl Object {
    pub fn new(class: impl Into<String>) -> Self {
        Self(Arc::new(ObjectInner {
            class: class.into(),
            members: BTreeMap::new(),
        }))
    }

    /// Add a plain member while building the object
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.0)
            .members
            .insert(name.into(), value.into());
        self
    }

    /// Add a callable member while building the object
    pub fn with_method<F>(self, name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Raised> + Send + Sync + 'static,
    {
        let name = name.into();
        let function = Function::new(name.clone(), call);
        self.with_attr(name, function)
    }

    pub fn class(&self) -> &str {
        &self.0.class
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.members.get(name)
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.0.members.contains_key(name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        matches!(self.0.members.get(name), Some(Value::Function(_)))
    }

    /// Member names in sorted order
    pub fn member_names(&self) -> Vec<String> {
        self.0.members.keys().cloned().collect()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Type token used by `be_a`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
    Function,
    Type,
    Error,
    /// Objects are typed by class name
    Object(String),
}

impl ValueType {
    pub fn name(&self) -> &str {
        match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::List => "list",
            Self::Map => "map",
            Self::Function => "function",
            Self::Type => "type",
            Self::Error => "error",
            Self::Object(class) => class,
        }
    }
}

impl FromStr for ValueType {
    type Err = Infallible;

    /// Built-in names map to their variant; any other name is a class.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "nil" => Self::Nil,
            "bool" => Self::Bool,
            "int" => Self::Int,
            "float" => Self::Float,
            "str" => Self::Str,
            "list" => Self::List,
            "map" => Self::Map,
            "function" => Self::Function,
            "type" => Self::Type,
            "error" => Self::Error,
            class => Self::Object(class.to_string()),
        })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(Object),
    Function(Function),
    Type(ValueType),
    Error(ErrorKind),
}

impl Value {
    /// Shorthand for a function value
    pub fn function<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Raised> + Send + Sync + 'static,
    {
        Self::Function(Function::new(name, call))
    }

    pub fn type_of(&self) -> ValueType {
        match self {
            Self::Nil => ValueType::Nil,
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Str(_) => ValueType::Str,
            Self::List(_) => ValueType::List,
            Self::Map(_) => ValueType::Map,
            Self::Object(o) => ValueType::Object(o.class().to_string()),
            Self::Function(_) => ValueType::Function,
            Self::Type(_) => ValueType::Type,
            Self::Error(_) => ValueType::Error,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Strings, lists and maps can be measured and searched
    pub fn is_iterable(&self) -> bool {
        matches!(self, Self::Str(_) | Self::List(_) | Self::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&ValueType> {
        match self {
            Self::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_error_kind(&self) -> Option<&ErrorKind> {
        match self {
            Self::Error(kind) => Some(kind),
            _ => None,
        }
    }

    /// Call a function value
    pub fn call(&self, args: &[Value]) -> Result<Value, Raised> {
        match self {
            Self::Function(func) => func.call(args),
            other => Err(Raised::type_error(format!(
                "'{}' object is not callable",
                other.type_of()
            ))),
        }
    }

    /// Read a member of an object
    pub fn get_attr(&self, name: &str) -> Result<Value, Raised> {
        match self {
            Self::Object(o) => o.get(name).cloned().ok_or_else(|| {
                Raised::attribute(format!("'{}' object has no attribute '{}'", o.class(), name))
            }),
            other => Err(Raised::attribute(format!(
                "'{}' object has no attribute '{}'",
                other.type_of(),
                name
            ))),
        }
    }

    pub fn add(&self, rhs: &Value) -> Result<Value, Raised> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_add(*b).map(Self::Int).ok_or_else(overflow),
            (Self::Str(a), Self::Str(b)) => Ok(Self::Str(format!("{a}{b}"))),
            (Self::List(a), Self::List(b)) => Ok(Self::List(a.iter().chain(b).cloned().collect())),
            _ => self.float_op(rhs, "+", |a, b| a + b),
        }
    }

    pub fn sub(&self, rhs: &Value) -> Result<Value, Raised> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_sub(*b).map(Self::Int).ok_or_else(overflow),
            _ => self.float_op(rhs, "-", |a, b| a - b),
        }
    }

    pub fn mul(&self, rhs: &Value) -> Result<Value, Raised> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_mul(*b).map(Self::Int).ok_or_else(overflow),
            _ => self.float_op(rhs, "*", |a, b| a * b),
        }
    }

    /// True division: the result is always a float
    pub fn div(&self, rhs: &Value) -> Result<Value, Raised> {
        let (a, b) = self.numeric_pair(rhs, "/")?;
        if b == 0.0 {
            return Err(Raised::zero_division());
        }
        Ok(Self::Float(a / b))
    }

    pub fn len(&self) -> Result<usize, Raised> {
        match self {
            Self::Str(s) => Ok(s.chars().count()),
            Self::List(items) => Ok(items.len()),
            Self::Map(map) => Ok(map.len()),
            other => Err(Raised::type_error(format!(
                "object of type '{}' has no len()",
                other.type_of()
            ))),
        }
    }

    /// Membership: list element, substring, or map key
    pub fn contains(&self, item: &Value) -> Result<bool, Raised> {
        match (self, item) {
            (Self::List(items), _) => Ok(items.contains(item)),
            (Self::Str(s), Self::Str(needle)) => Ok(s.contains(needle.as_str())),
            (Self::Map(map), Self::Str(key)) => Ok(map.contains_key(key)),
            (Self::Str(_), other) => Err(Raised::type_error(format!(
                "'in <string>' requires string as left operand, not {}",
                other.type_of()
            ))),
            (Self::Map(_), _) => Ok(false),
            (other, _) => Err(Raised::type_error(format!(
                "argument of type '{}' is not iterable",
                other.type_of()
            ))),
        }
    }

    fn numeric_pair(&self, rhs: &Value, op: &str) -> Result<(f64, f64), Raised> {
        match (self.as_float(), rhs.as_float()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(Raised::type_error(format!(
                "unsupported operand type(s) for {}: '{}' and '{}'",
                op,
                self.type_of(),
                rhs.type_of()
            ))),
        }
    }

    fn float_op(&self, rhs: &Value, op: &str, f: fn(f64, f64) -> f64) -> Result<Value, Raised> {
        let (a, b) = self.numeric_pair(rhs, op)?;
        Ok(Self::Float(f(a, b)))
    }

    /// Render as an element of a collection, quoting strings
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{s}'"),
            other => write!(f, "{other}"),
        }
    }
}

fn overflow() -> Raised {
    Raised::new(ErrorKind::OVERFLOW, "integer overflow")
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            (Self::Type(a), Self::Type(b)) => a == b,
            (Self::Error(a), Self::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{key}': ")?;
                    value.fmt_nested(f)?;
                }
                f.write_str("}")
            }
            Self::Object(o) => write!(f, "<{} object>", o.class()),
            Self::Function(func) => write!(f, "<function {}>", func.name()),
            Self::Type(t) => write!(f, "<type {t}>"),
            Self::Error(kind) => write!(f, "{kind}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        i64::try_from(i).map_or(Self::Float(i as f64), Self::Int)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Nil, Into::into)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Nil
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Self::Function(func)
    }
}

impl From<ValueType> for Value {
    fn from(t: ValueType) -> Self {
        Self::Type(t)
    }
}

impl From<ErrorKind> for Value {
    fn from(kind: ErrorKind) -> Self {
        Self::Error(kind)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
