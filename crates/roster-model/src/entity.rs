//! Typed client, worker and task records
//!
//! Produced by the row mapper from [`RawRow`](crate::RawRow)s. Every member
//! is a [`Field`] so that "column missing", "cell blank" and "cell present
//! but not coercible" stay distinguishable for validation.

use crate::cell::CellValue;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Integer-indexed scheduling slot
pub type Phase = i64;

/// A normalized cell with its provenance
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// Column not present in the row
    Missing,
    /// Column present, cell blank
    Empty,
    /// Normalized value
    Value(T),
    /// Present and non-blank but not coercible; carries the raw cell
    Invalid(CellValue),
}

impl<T> Field<T> {
    /// Missing or empty
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Missing | Self::Empty)
    }

    /// Column absent from the row
    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Normalized value, if any
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Map the normalized value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Missing => Field::Missing,
            Self::Empty => Field::Empty,
            Self::Value(v) => Field::Value(f(v)),
            Self::Invalid(raw) => Field::Invalid(raw),
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Missing | Self::Empty => serializer.serialize_none(),
            Self::Value(v) => v.serialize(serializer),
            Self::Invalid(raw) => raw.serialize(serializer),
        }
    }
}

/// A list cell after normalization
///
/// `malformed` is set when the raw input was non-blank but yielded nothing,
/// or when an explicit array held elements that are not numbers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence<T> {
    /// Parsed elements
    pub items: Vec<T>,
    /// Input was not cleanly parseable
    pub malformed: bool,
    /// Cell as it arrived
    pub raw: CellValue,
}

impl<T> Sequence<T> {
    /// Number of parsed elements
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing parsed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Serialize> Serialize for Sequence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

/// Outcome of reading an `AttributesJSON` cell
#[derive(Debug, Clone, PartialEq)]
pub enum Attributes {
    /// Valid JSON
    Parsed(Value),
    /// Free text wrapped as `{"message": text}`
    Repaired(Map<String, Value>),
    /// Looked like JSON but failed to parse; original text kept
    Broken(String),
}

impl Attributes {
    /// Value to store back into the sheet
    #[must_use]
    pub fn stored_value(&self) -> Value {
        match self {
            Self::Parsed(v) => v.clone(),
            Self::Repaired(map) => Value::Object(map.clone()),
            Self::Broken(s) => Value::String(s.clone()),
        }
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.stored_value().serialize(serializer)
    }
}

/// Client record
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Client {
    #[serde(rename = "ClientID")]
    pub client_id: Field<String>,
    pub client_name: Field<String>,
    pub priority_level: Field<f64>,
    #[serde(rename = "RequestedTaskIDs")]
    pub requested_task_ids: Field<Vec<String>>,
    pub group_tag: Field<String>,
    #[serde(rename = "AttributesJSON")]
    pub attributes: Field<Attributes>,
}

impl Client {
    /// Requested task IDs, empty when not given
    #[must_use]
    pub fn requested_tasks(&self) -> &[String] {
        self.requested_task_ids.value().map_or(&[], Vec::as_slice)
    }
}

/// Worker record
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Worker {
    #[serde(rename = "WorkerID")]
    pub worker_id: Field<String>,
    pub worker_name: Field<String>,
    pub skills: Field<Vec<String>>,
    pub available_slots: Field<Sequence<Phase>>,
    pub max_load_per_phase: Field<f64>,
    pub worker_group: Field<String>,
    pub qualification_level: Field<CellValue>,
}

impl Worker {
    /// Skills, empty when not given
    #[must_use]
    pub fn skill_list(&self) -> &[String] {
        self.skills.value().map_or(&[], Vec::as_slice)
    }

    /// Available phases, empty when not given
    #[must_use]
    pub fn slots(&self) -> &[Phase] {
        self.available_slots
            .value()
            .map_or(&[], |s| s.items.as_slice())
    }
}

/// Task record
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(rename = "TaskID")]
    pub task_id: Field<String>,
    pub task_name: Field<String>,
    pub category: Field<String>,
    pub duration: Field<f64>,
    pub required_skills: Field<Vec<String>>,
    pub preferred_phases: Field<Sequence<Phase>>,
    pub max_concurrent: Field<f64>,
}

impl Task {
    /// Required skills, empty when not given
    #[must_use]
    pub fn skill_list(&self) -> &[String] {
        self.required_skills.value().map_or(&[], Vec::as_slice)
    }

    /// Preferred phases, empty when not given
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        self.preferred_phases
            .value()
            .map_or(&[], |s| s.items.as_slice())
    }
}
