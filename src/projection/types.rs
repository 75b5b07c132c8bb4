//! Field projection types

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::selector::ID_FIELD;

/// Whether a projected field is included (`1`) or excluded (`0`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldMode {
    Include,
    Exclude,
}

impl FieldMode {
    /// Reads a mode from its JSON form.
    ///
    /// Numbers are truthy unless zero; booleans map directly.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(FieldMode::Include),
            Value::Bool(false) => Some(FieldMode::Exclude),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f == 0.0 => Some(FieldMode::Exclude),
                Some(_) => Some(FieldMode::Include),
                None => None,
            },
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            FieldMode::Include => 1,
            FieldMode::Exclude => 0,
        }
    }

    pub fn is_include(&self) -> bool {
        *self == FieldMode::Include
    }
}

impl fmt::Display for FieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl Serialize for FieldMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for FieldMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        FieldMode::from_value(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid field mode: {}", raw)))
    }
}

/// A field projection: field path (dot-separated) to include/exclude.
///
/// A single map should carry one polarity; mixed polarity only arises
/// legitimately when maps from different levels are merged. An inclusion
/// projection may then carry exclusions nested under its included paths,
/// and `_id: 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Projection {
    fields: BTreeMap<String, FieldMode>,
    /// Inclusion mode even with nothing included. Only produced by merging.
    #[serde(skip)]
    empty_inclusion: bool,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_map(fields: BTreeMap<String, FieldMode>) -> Self {
        Self {
            fields,
            empty_inclusion: false,
        }
    }

    /// Inclusion projection that returns no fields at all, not even `_id`
    pub fn nothing() -> Self {
        Self {
            fields: BTreeMap::from([(ID_FIELD.to_string(), FieldMode::Exclude)]),
            empty_inclusion: true,
        }
    }

    /// Projection including exactly `fields`
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_map(
            fields
                .into_iter()
                .map(|f| (f.into(), FieldMode::Include))
                .collect(),
        )
    }

    /// Projection excluding `fields`
    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_map(
            fields
                .into_iter()
                .map(|f| (f.into(), FieldMode::Exclude))
                .collect(),
        )
    }

    pub fn with(mut self, field: impl Into<String>, mode: FieldMode) -> Self {
        self.fields.insert(field.into(), mode);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, mode: FieldMode) {
        self.fields.insert(field.into(), mode);
    }

    pub fn get(&self, field: &str) -> Option<FieldMode> {
        self.fields.get(field).copied()
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldMode> {
        self.fields.remove(field)
    }

    /// True if any field is included
    pub fn has_inclusions(&self) -> bool {
        self.fields.values().any(FieldMode::is_include)
    }

    /// True if documents are built from the included paths only
    pub fn is_inclusion(&self) -> bool {
        self.empty_inclusion || self.has_inclusions()
    }

    /// True if any field is excluded
    pub fn has_exclusions(&self) -> bool {
        self.fields.values().any(|m| !m.is_include())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldMode)> {
        self.fields.iter()
    }

    /// Fields carrying `mode`
    pub fn fields_with(&self, mode: FieldMode) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(move |(_, m)| **m == mode)
            .map(|(f, _)| f.as_str())
    }
}

/// True if `path` is `parent` or lies beneath it
pub fn covers(parent: &str, path: &str) -> bool {
    path.strip_prefix(parent)
        .map(|rest| rest.is_empty() || rest.starts_with('.'))
        .unwrap_or(false)
}

impl FromIterator<(String, FieldMode)> for Projection {
    fn from_iter<T: IntoIterator<Item = (String, FieldMode)>>(iter: T) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}
