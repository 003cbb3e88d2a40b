//! Kind-agnostic structural checks
//!
//! Required columns, required cell values and duplicate IDs. These only need
//! the kind's schema, so they run straight on the raw rows.

use roster_model::{EntityKind, ErrorCategory, RawRow, ValidationError};
use std::collections::HashSet;

/// Lowercased column names present anywhere in the sheet
fn header_set(rows: &[RawRow]) -> HashSet<String> {
    rows.iter()
        .flat_map(RawRow::columns)
        .map(|c| c.trim().to_ascii_lowercase())
        .collect()
}

/// One sheet-level error per required column absent from the header
///
/// An empty sheet has no header and reports nothing.
#[must_use]
pub fn check_required_columns(kind: EntityKind, rows: &[RawRow]) -> Vec<ValidationError> {
    if rows.is_empty() {
        return Vec::new();
    }
    let headers = header_set(rows);
    kind.required_columns()
        .filter(|col| !headers.contains(&col.to_ascii_lowercase()))
        .map(|col| {
            ValidationError::sheet(
                ErrorCategory::Structural,
                col,
                format!("Missing required column: {col}"),
            )
        })
        .collect()
}

/// Row-level errors for blank required cells
///
/// Columns missing from the whole sheet are skipped here; they are reported
/// once by [`check_required_columns`].
#[must_use]
pub fn check_required_fields(kind: EntityKind, rows: &[RawRow]) -> Vec<ValidationError> {
    let headers = header_set(rows);
    let required: Vec<&'static str> = kind
        .fields()
        .iter()
        .filter(|f| f.required_value && headers.contains(&f.name.to_ascii_lowercase()))
        .map(|f| f.name)
        .collect();

    let mut errors = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        for column in &required {
            if row.get(column).map_or(true, |v| v.is_blank()) {
                errors.push(ValidationError::row(
                    ErrorCategory::Structural,
                    index,
                    *column,
                    format!("{column} is required"),
                ));
            }
        }
    }
    errors
}

/// Flag the second and later occurrences of each ID
///
/// IDs are compared in string-coerced, trimmed form. Blank IDs never count
/// as duplicates of each other; the required-field check reports them.
#[must_use]
pub fn check_duplicate_ids(kind: EntityKind, rows: &[RawRow]) -> Vec<ValidationError> {
    let column = kind.id_column();
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(raw) = row.get(column).filter(|v| !v.is_blank()) else {
            continue;
        };
        let id = raw.to_text().trim().to_string();
        if !seen.insert(id.clone()) {
            errors.push(
                ValidationError::row(
                    ErrorCategory::Uniqueness,
                    index,
                    column,
                    format!("Duplicate {column}: {id}"),
                )
                .with_value(raw.to_json()),
            );
        }
    }
    errors
}
