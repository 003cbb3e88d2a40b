//! Raw rows and workbook snapshots
//!
//! A [`Workbook`] is the complete snapshot handed over by the spreadsheet
//! reader: sheet name to rows, each row a column-name to cell map. Both
//! levels keep insertion order because "first encountered" decides ties.

use crate::cell::CellValue;
use crate::error::WorkbookError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One untyped record as read from a sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: IndexMap<String, CellValue>,
}

impl RawRow {
    /// Create empty row
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Insert or replace a cell (exact key)
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Find the actual key matching `column` case-insensitively
    ///
    /// The first key in insertion order wins when several collide.
    #[must_use]
    pub fn find_key(&self, column: &str) -> Option<&str> {
        self.cells
            .keys()
            .find(|k| k.trim().eq_ignore_ascii_case(column))
            .map(String::as_str)
    }

    /// Case-insensitive lookup
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.find_key(column).and_then(|k| self.cells.get(k))
    }

    /// Replace the value stored under the case-insensitive match of `column`
    ///
    /// Returns `false` when no such column exists.
    pub fn replace(&mut self, column: &str, value: CellValue) -> bool {
        let Some(key) = self.find_key(column).map(str::to_string) else {
            return false;
        };
        self.cells.insert(key, value);
        true
    }

    /// Column names in sheet order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Iterate `(column, value)` pairs in sheet order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of cells
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if row has no cells
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Full snapshot of every uploaded sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Workbook {
    sheets: IndexMap<String, Vec<RawRow>>,
}

impl Workbook {
    /// Create empty workbook
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style sheet insert
    #[must_use]
    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        self.sheets.insert(name.into(), rows);
        self
    }

    /// Insert or replace a sheet
    pub fn insert_sheet(&mut self, name: impl Into<String>, rows: Vec<RawRow>) {
        self.sheets.insert(name.into(), rows);
    }

    /// Rows of a sheet by exact name
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&[RawRow]> {
        self.sheets.get(name).map(Vec::as_slice)
    }

    /// Mutable rows of a sheet by exact name
    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Vec<RawRow>> {
        self.sheets.get_mut(name)
    }

    /// Iterate sheets in upload order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &[RawRow])> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Sheet names in upload order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// Number of sheets
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Check if workbook has no sheets
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Parse a snapshot from JSON text
    ///
    /// The expected shape is an object of arrays of objects:
    /// `{"Clients": [{"ClientID": "C1", ...}], ...}`.
    ///
    /// # Errors
    /// Returns [`WorkbookError::Malformed`] when the text is not JSON of that shape.
    pub fn from_json_str(text: &str) -> Result<Self, WorkbookError> {
        serde_json::from_str(text).map_err(WorkbookError::Malformed)
    }

    /// Read a snapshot file
    ///
    /// # Errors
    /// Returns [`WorkbookError::Io`] on read failure or
    /// [`WorkbookError::Malformed`] on shape mismatch.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WorkbookError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| WorkbookError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Render the snapshot as pretty JSON
    ///
    /// # Errors
    /// Returns [`WorkbookError::Malformed`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, WorkbookError> {
        serde_json::to_string_pretty(self).map_err(WorkbookError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let row = RawRow::new().with("clientid", "C1").with("ClientName", "Acme");
        assert_eq!(row.get("ClientID"), Some(&CellValue::text("C1")));
        assert_eq!(row.get("CLIENTNAME"), Some(&CellValue::text("Acme")));
        assert_eq!(row.get("PriorityLevel"), None);
    }

    #[test]
    fn first_colliding_key_wins() {
        let row = RawRow::new().with("TaskID", "T1").with("taskid", "T2");
        assert_eq!(row.find_key("TASKID"), Some("TaskID"));
        assert_eq!(row.get("taskId"), Some(&CellValue::text("T1")));
    }

    #[test]
    fn replace_keeps_original_key_casing() {
        let mut row = RawRow::new().with("attributesjson", "vip");
        assert!(row.replace("AttributesJSON", CellValue::Number(1.0)));
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["attributesjson"]);
        assert!(!row.replace("Missing", CellValue::Absent));
    }

    #[test]
    fn workbook_json_preserves_order() {
        let text = r#"{
            "Workers": [{"WorkerID": "W1", "Skills": "a,b"}],
            "Clients 1": [{"ClientID": "C1"}]
        }"#;
        let wb = Workbook::from_json_str(text).unwrap();
        assert_eq!(wb.sheet_names().collect::<Vec<_>>(), vec!["Workers", "Clients 1"]);
        assert_eq!(wb.sheet("Workers").unwrap().len(), 1);
    }

    #[test]
    fn insert_replaces_exact_key_only() {
        let mut row = RawRow::new().with("TaskID", "T1");
        row.insert("TaskID", "T2");
        row.insert("taskid", "T3");
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("TASKID"), Some(&CellValue::text("T2")));

        let mut wb = Workbook::new().with_sheet("Tasks", vec![row]);
        wb.insert_sheet("Tasks", Vec::new());
        wb.insert_sheet("Workers", vec![RawRow::new()]);
        assert_eq!(wb.sheet_names().collect::<Vec<_>>(), vec!["Tasks", "Workers"]);
        assert_eq!(wb.sheet("Tasks").map(<[RawRow]>::len), Some(0));
    }

    #[test]
    fn workbook_rejects_wrong_shape() {
        assert!(Workbook::from_json_str("[1, 2]").is_err());
        assert!(Workbook::from_json_str(r#"{"Clients": 3}"#).is_err());
    }
}
