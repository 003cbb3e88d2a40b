//! Error types for the roster model
//!
//! Two very different things live here:
//! - [`ValidationError`]: a located data problem reported back to the user.
//!   Never a Rust error; validation accumulates these.
//! - [`WorkbookError`]: infrastructure failure while loading a snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Row index used for sheet-level errors in serialized output
pub const SHEET_LEVEL_ROW: i64 = -1;

/// Errors while loading a workbook snapshot
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    /// Snapshot file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot is not an object of arrays of objects
    #[error("malformed workbook snapshot: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl WorkbookError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Severity of a reported problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks the data from being accepted
    #[default]
    Error,
    /// Reported but informational
    Warning,
}

/// Error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Missing required column or field
    Structural,
    /// Duplicate ID
    Uniqueness,
    /// Numeric value out of domain or not numeric
    Range,
    /// Malformed list or JSON
    Format,
    /// Reference to an entity that does not exist
    Referential,
    /// Aggregate constraint across entities
    Capacity,
}

/// Where in a sheet a problem was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowRef {
    /// Aggregate or header-level condition
    Sheet,
    /// Zero-based row index
    Row(usize),
}

impl RowRef {
    /// Wire form: row index, or `-1` for sheet-level
    #[must_use]
    pub fn as_index(self) -> i64 {
        match self {
            Self::Sheet => SHEET_LEVEL_ROW,
            Self::Row(i) => i64::try_from(i).unwrap_or(i64::MAX),
        }
    }

    /// Inverse of [`RowRef::as_index`]; any negative index is sheet-level
    #[must_use]
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index).map_or(Self::Sheet, Self::Row)
    }
}

impl Serialize for RowRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_index())
    }
}

impl<'de> Deserialize<'de> for RowRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::from_index)
    }
}

/// A located data problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Error or warning
    #[serde(rename = "type")]
    pub severity: Severity,
    /// Taxonomy bucket
    pub category: ErrorCategory,
    /// Human-readable description
    pub message: String,
    /// Row or sheet-level location
    #[serde(rename = "rowIndex")]
    pub row: RowRef,
    /// Canonical column name
    pub column: String,
    /// Actual uploaded sheet name, filled by the orchestrator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    /// Offending value, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ValidationError {
    /// Create a row-level error
    #[must_use]
    pub fn row(
        category: ErrorCategory,
        row: usize,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message: message.into(),
            row: RowRef::Row(row),
            column: column.into(),
            sheet_name: None,
            value: None,
        }
    }

    /// Create a sheet-level error
    #[must_use]
    pub fn sheet(
        category: ErrorCategory,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message: message.into(),
            row: RowRef::Sheet,
            column: column.into(),
            sheet_name: None,
            value: None,
        }
    }

    /// Attach the offending value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach the sheet name
    #[must_use]
    pub fn in_sheet(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = Some(sheet_name.into());
        self
    }

    /// Downgrade to a warning
    #[must_use]
    pub fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Row index in wire form (`-1` for sheet-level)
    #[inline]
    #[must_use]
    pub fn row_index(&self) -> i64 {
        self.row.as_index()
    }

    /// Check if this is a sheet-level error
    #[inline]
    #[must_use]
    pub fn is_sheet_level(&self) -> bool {
        matches!(self.row, RowRef::Sheet)
    }
}

/// Aggregated outcome of a validation run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True iff `errors` is empty
    pub is_valid: bool,
    /// Every problem found, in check order
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Build a report from an error list
    #[must_use]
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Errors attributed to a given sheet
    pub fn for_sheet<'a>(&'a self, sheet_name: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors
            .iter()
            .filter(move |e| e.sheet_name.as_deref() == Some(sheet_name))
    }

    /// Number of entries with [`Severity::Error`]
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors
            .iter()
            .filter(|e| e.severity == Severity::Error)
            .count()
    }

    /// Number of entries with [`Severity::Warning`]
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.errors.len() - self.error_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sheet_level_serializes_as_minus_one() {
        let err = ValidationError::sheet(ErrorCategory::Capacity, "PreferredPhases", "phase 1")
            .in_sheet("Tasks");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["rowIndex"], json!(-1));
        assert_eq!(value["type"], json!("error"));
        assert_eq!(value["sheetName"], json!("Tasks"));
        assert!(value.get("value").is_none());
    }

    #[test]
    fn row_level_roundtrip() {
        let err = ValidationError::row(ErrorCategory::Range, 4, "Duration", "bad")
            .with_value(json!(0));
        let text = serde_json::to_string(&err).unwrap();
        let back: ValidationError = serde_json::from_str(&text).unwrap();
        assert_eq!(back, err);
        assert_eq!(back.row_index(), 4);
    }

    #[test]
    fn report_validity_tracks_errors() {
        assert!(ValidationReport::from_errors(vec![]).is_valid);
        let report = ValidationReport::from_errors(vec![
            ValidationError::sheet(ErrorCategory::Structural, "X", "missing").as_warning(),
        ]);
        assert!(!report.is_valid);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn workbook_error_display() {
        let err = WorkbookError::io(
            "snap.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("snap.json"));
    }
}
