//! Raw cell values
//!
//! [`CellValue`] is the closed set of shapes a spreadsheet reader may hand
//! over for a single cell. Upstream readers pre-parse some cells (numbers,
//! arrays, objects) and leave others as text, so every shape is accepted here
//! and narrowed later by the row mapper.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// A single untyped cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum CellValue {
    /// Plain text as typed into the sheet
    Text(String),
    /// Numeric cell
    Number(f64),
    /// Sequence of strings (pre-split list or mixed array)
    TextList(Vec<String>),
    /// Sequence of numbers
    NumberList(Vec<f64>),
    /// Already-parsed JSON object
    Object(Map<String, Value>),
    /// No value (`null` or explicitly absent)
    #[default]
    Absent,
}

impl CellValue {
    /// Create a text cell
    #[inline]
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Check if cell carries nothing usable
    ///
    /// Absent values, whitespace-only text and empty lists are blank.
    /// Numbers and objects never are.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::TextList(items) => items.is_empty(),
            Self::NumberList(items) => items.is_empty(),
            Self::Number(_) | Self::Object(_) => false,
        }
    }

    /// Borrow the text if this is a text cell
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// String coercion in spreadsheet display form
    ///
    /// Integral numbers drop the fractional part, lists join with `,`,
    /// objects render as compact JSON, and absent values become `""`.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::TextList(items) => items.join(","),
            Self::NumberList(items) => items
                .iter()
                .map(|n| format_number(*n))
                .collect::<Vec<_>>()
                .join(","),
            Self::Object(map) => Value::Object(map.clone()).to_string(),
            Self::Absent => String::new(),
        }
    }

    /// Convert into a JSON value (lossless)
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::from(self.clone())
    }
}

/// Render a number the way a spreadsheet shows it
///
/// `3.0` renders as `3`, `2.5` stays `2.5`.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = n as i64;
        whole.to_string()
    } else {
        n.to_string()
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Bool(b) => Self::Text(b.to_string()),
            Value::Number(n) => n.as_f64().map_or(Self::Absent, Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => {
                if items.iter().all(Value::is_number) {
                    Self::NumberList(items.iter().filter_map(Value::as_f64).collect())
                } else {
                    Self::TextList(items.into_iter().map(json_to_text).collect())
                }
            }
            Value::Object(map) => Self::Object(map),
        }
    }
}

impl From<CellValue> for Value {
    fn from(cell: CellValue) -> Self {
        match cell {
            CellValue::Text(s) => Value::String(s),
            CellValue::Number(n) => number_to_json(n),
            CellValue::TextList(items) => {
                Value::Array(items.into_iter().map(Value::String).collect())
            }
            CellValue::NumberList(items) => {
                Value::Array(items.into_iter().map(number_to_json).collect())
            }
            CellValue::Object(map) => Value::Object(map),
            CellValue::Absent => Value::Null,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

/// Integral numbers serialize as JSON integers
fn number_to_json(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = n as i64;
        Value::from(whole)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn json_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_number),
        other => other.to_string(),
    }
}
