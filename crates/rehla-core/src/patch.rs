//! Explicit field updates for partial document writes.
//!
//! Every mutable entity has a patch type with named optional fields. A patch
//! converts itself into [`FieldUpdates`], which the document store applies
//! field by field. Only fields that are `Some` end up in the update list.

use serde::Serialize;
use serde_json::Value;

/// One field write: a top-level field name and its new value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    /// Field name inside the document.
    pub path: String,
    /// New value for the field.
    pub value: Value,
}

/// Ordered list of field writes built by a patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdates(Vec<FieldUpdate>);

impl FieldUpdates {
    /// Creates an empty update list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field write.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.0.push(FieldUpdate {
            path: path.to_string(),
            value: value.into(),
        });
        self
    }

    /// Adds a field write only when the value is present.
    #[must_use]
    pub fn set_opt<V: Into<Value>>(self, path: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(path, value),
            None => self,
        }
    }

    /// Adds a field write for any serializable value, such as a timestamp.
    #[must_use]
    pub fn set_serialized<V: Serialize>(self, path: &str, value: Option<&V>) -> Self {
        match value.and_then(|v| serde_json::to_value(v).ok()) {
            Some(value) => self.set(path, value),
            None => self,
        }
    }

    /// Returns true when no field is written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of field writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the writes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldUpdate> {
        self.0.iter()
    }

    /// Returns the value written to `path`, if any.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.0.iter().rev().find(|u| u.path == path).map(|u| &u.value)
    }

    /// Consumes the list.
    #[must_use]
    pub fn into_inner(self) -> Vec<FieldUpdate> {
        self.0
    }
}

impl IntoIterator for FieldUpdates {
    type Item = FieldUpdate;
    type IntoIter = std::vec::IntoIter<FieldUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
