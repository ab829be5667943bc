//! Build-time scope shared by filename expansion and templates.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Immutable key/value context for one level of the tree.
///
/// Cloning is cheap; extending copies the top-level map and leaves this
/// scope untouched, so sibling loop iterations never see each other's
/// bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope(Arc<Map<String, Value>>);

impl Scope {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(Arc::new(values))
    }

    /// Builds a scope from a JSON value, which must be an object (or null for an empty scope).
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            Value::Null => Ok(Self::default()),
            other => Err(Error::ConfigError(format!(
                "scope must be an object, got {other}"
            ))),
        }
    }

    /// Looks up a dotted path such as `site.title` or `items.0.name`.
    ///
    /// Object segments select keys, numeric segments index into arrays.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns a new scope with `key` bound to `value`.
    pub fn extend(&self, key: &str, value: Value) -> Self {
        let mut values = (*self.0).clone();
        values.insert(key.to_string(), value);
        Self::new(values)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Scope {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

/// Falsy values (null, false, zero, empty strings and lists) prune loop directives.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}
