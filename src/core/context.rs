//! Structured context supplied with a log call
//!
//! This module provides:
//! - `ContextValue`: a literal, a nested list/map, or a lazy `Producer`
//! - `Context`: an insertion-ordered mapping of keys to `ContextValue`s
//! - `FieldValue`: the scalar leaf type that ends up in a GELF record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Scalar value stored in a flattened field
///
/// Numbers and booleans keep their native type all the way to the
/// serialised record; nothing is coerced to a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Zero-argument value producer, evaluated when the context is flattened
#[derive(Clone)]
pub struct Producer(Arc<dyn Fn() -> ContextValue + Send + Sync>);

impl Producer {
    pub fn new<F, V>(f: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<ContextValue>,
    {
        Producer(Arc::new(move || f().into()))
    }

    pub fn call(&self) -> ContextValue {
        (self.0)()
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Producer(..)")
    }
}

/// A value inside a [`Context`]
#[derive(Debug, Clone, Default)]
pub enum ContextValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ContextValue>),
    Map(Context),
    Producer(Producer),
}

impl ContextValue {
    /// Wrap a closure as a lazily evaluated value
    pub fn producer<F, V>(f: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<ContextValue>,
    {
        ContextValue::Producer(Producer::new(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ContextValue::Null)
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::String(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::String(s)
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        ContextValue::Int(i)
    }
}

impl From<i32> for ContextValue {
    fn from(i: i32) -> Self {
        ContextValue::Int(i as i64)
    }
}

impl From<u32> for ContextValue {
    fn from(i: u32) -> Self {
        ContextValue::Int(i as i64)
    }
}

impl From<f64> for ContextValue {
    fn from(f: f64) -> Self {
        ContextValue::Float(f)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Bool(b)
    }
}

impl From<Context> for ContextValue {
    fn from(map: Context) -> Self {
        ContextValue::Map(map)
    }
}

impl From<Producer> for ContextValue {
    fn from(producer: Producer) -> Self {
        ContextValue::Producer(producer)
    }
}

impl From<FieldValue> for ContextValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::String(s) => ContextValue::String(s),
            FieldValue::Int(i) => ContextValue::Int(i),
            FieldValue::Float(f) => ContextValue::Float(f),
            FieldValue::Bool(b) => ContextValue::Bool(b),
        }
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(items: Vec<T>) -> Self {
        ContextValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ContextValue>> From<Option<T>> for ContextValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ContextValue::Null, Into::into)
    }
}

/// Ordered key/value context for one log call
///
/// Keys keep the order they were first inserted in. Re-inserting a key
/// replaces its value without moving it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    fields: Vec<(String, ContextValue)>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Build a context from a sequence, keyed by position (`"0"`, `"1"`, ...)
    pub fn from_list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ContextValue>,
    {
        items
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value.into()))
            .collect()
    }

    /// Add a field to the context
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.insert(key, value);
        self
    }

    /// Add a field to the context (mutable version)
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<ContextValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Context::new();
        for (key, value) in iter {
            context.insert(key, value);
        }
        context
    }
}
