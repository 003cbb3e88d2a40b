//! Cell-edit canonicalization
//!
//! When a user edits a single cell, the value is canonicalized before it is
//! written back into the snapshot so that the stored form is the expanded
//! one (`"1-3"` is persisted as `[1, 2, 3]`). Values that cannot be
//! canonicalized are stored as typed so the next validation run flags them.

use crate::scalar::{
    coerce_number, parse_attributes_json, parse_comma_list, parse_number_sequence_with,
    parse_phase_expression_with, NormalizeOptions,
};
use roster_model::{Attributes, CellValue, EntityKind, SemanticType};

/// Canonicalize an edited cell with default options
#[must_use]
pub fn normalize_cell_edit(kind: EntityKind, column: &str, value: CellValue) -> CellValue {
    normalize_cell_edit_with(kind, column, value, &NormalizeOptions::default())
}

/// Canonicalize an edited cell
///
/// Unknown columns and blank values pass through untouched.
#[must_use]
pub fn normalize_cell_edit_with(
    kind: EntityKind,
    column: &str,
    value: CellValue,
    options: &NormalizeOptions,
) -> CellValue {
    let Some(spec) = kind.field(column) else {
        return value;
    };
    if value.is_blank() {
        return value;
    }

    match spec.semantic {
        SemanticType::Text | SemanticType::Any => value,
        SemanticType::Number => coerce_number(&value).map_or(value, CellValue::Number),
        SemanticType::CommaList => CellValue::TextList(parse_comma_list(&value)),
        SemanticType::NumberSequence => {
            let parsed = parse_number_sequence_with(&value, options);
            if parsed.was_malformed {
                value
            } else {
                CellValue::NumberList(parsed.value)
            }
        }
        SemanticType::PhaseExpression => {
            let parsed = parse_phase_expression_with(&value, options);
            if parsed.was_malformed {
                value
            } else {
                #[allow(clippy::cast_precision_loss)]
                let phases = parsed.value.into_iter().map(|p| p as f64).collect();
                CellValue::NumberList(phases)
            }
        }
        SemanticType::Json => match parse_attributes_json(&value) {
            Some(Attributes::Broken(_)) | None => value,
            Some(attrs) => CellValue::from(attrs.stored_value()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn phases_persist_expanded() {
        let out = normalize_cell_edit(EntityKind::Task, "preferredphases", CellValue::text("1-3"));
        assert_eq!(out, CellValue::NumberList(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn malformed_phases_stay_as_typed() {
        let out = normalize_cell_edit(EntityKind::Task, "PreferredPhases", CellValue::text("soon"));
        assert_eq!(out, CellValue::text("soon"));
    }

    #[test]
    fn numbers_and_lists() {
        assert_eq!(
            normalize_cell_edit(EntityKind::Client, "PriorityLevel", CellValue::text("4")),
            CellValue::Number(4.0)
        );
        assert_eq!(
            normalize_cell_edit(EntityKind::Client, "PriorityLevel", CellValue::text("high")),
            CellValue::text("high")
        );
        assert_eq!(
            normalize_cell_edit(EntityKind::Worker, "Skills", CellValue::text("a, b")),
            CellValue::TextList(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn attributes_are_repaired_on_edit() {
        let out = normalize_cell_edit(EntityKind::Client, "AttributesJSON", CellValue::text("vip"));
        assert_eq!(out.to_json(), json!({"message": "vip"}));
        let out = normalize_cell_edit(EntityKind::Client, "AttributesJSON", CellValue::text("{oops"));
        assert_eq!(out, CellValue::text("{oops"));
    }

    #[test]
    fn unknown_column_and_blank_pass_through() {
        let value = CellValue::text("1-3");
        assert_eq!(normalize_cell_edit(EntityKind::Task, "Notes", value.clone()), value);
        assert_eq!(
            normalize_cell_edit(EntityKind::Task, "Duration", CellValue::text(" ")),
            CellValue::text(" ")
        );
    }
}
