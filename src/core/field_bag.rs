// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Field bag: the ordered `(name, value)` state of one object.
//!
//! A bag is created fresh for every encode or decode call. On encode it is
//! filled by the object's extractor; on decode it is filled from the wire and
//! handed to the target type's reconstruction initializer.

use serde::{Deserialize, Serialize};

use super::error::{CodecError, Result};
use super::value::{FromValue, Value};

/// A single named entry in a [`FieldBag`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Field name
    pub name: String,
    /// Field value
    pub value: Value,
}

/// Ordered set of named values describing one object instance.
///
/// Entries keep insertion order, which is also the wire order. Names are
/// expected to be unique, but duplicates are not rejected; lookups return
/// the first match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldBag {
    type_name: String,
    entries: Vec<FieldEntry>,
}

impl FieldBag {
    /// Create an empty bag for the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            entries: Vec::new(),
        }
    }

    /// Create an empty bag with room for `capacity` entries.
    pub fn with_capacity(type_name: impl Into<String>, capacity: usize) -> Self {
        Self {
            type_name: type_name.into(),
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Name of the type this bag describes.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Append a named value.
    ///
    /// The value is stored in its normalized form (see [`Value::normalized`]),
    /// which is the form it decodes to.
    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.push(FieldEntry {
            name: name.into(),
            value: value.into().normalized(),
        });
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.value)
    }

    /// Check if a field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get a typed copy of a field.
    ///
    /// # Errors
    ///
    /// [`CodecError::MissingField`] if the name is absent,
    /// [`CodecError::TypeMismatch`] if the stored value does not convert.
    pub fn get_value<V: FromValue>(&self, name: &str) -> Result<V> {
        let value = self
            .get(name)
            .cloned()
            .ok_or_else(|| CodecError::missing_field(&self.type_name, name))?;
        convert(name, value)
    }

    /// Remove a field and convert it, avoiding a clone.
    ///
    /// Only the first entry with this name is removed.
    pub fn take_value<V: FromValue>(&mut self, name: &str) -> Result<V> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.name == name)
            .ok_or_else(|| CodecError::missing_field(&self.type_name, name))?;
        let entry = self.entries.remove(index);
        convert(name, entry.value)
    }

    /// Get a string field.
    pub fn get_string(&self, name: &str) -> Result<String> {
        self.get_value(name)
    }

    /// Get an integer field.
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.get_value(name)
    }

    /// Get a boolean field.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.get_value(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bag has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldEntry> {
        self.entries.iter()
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Convert to a JSON object with the type under `"$type"`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::with_capacity(self.entries.len() + 1);
        obj.insert(
            "$type".to_string(),
            serde_json::Value::String(self.type_name.clone()),
        );
        for entry in &self.entries {
            obj.insert(entry.name.clone(), entry.value.to_json());
        }
        serde_json::Value::Object(obj)
    }
}

fn convert<V: FromValue>(name: &str, value: Value) -> Result<V> {
    V::from_value(value)
        .map_err(|found| CodecError::type_mismatch(name, V::EXPECTED, found.type_name()))
}

impl IntoIterator for FieldBag {
    type Item = FieldEntry;
    type IntoIter = std::vec::IntoIter<FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldBag {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
