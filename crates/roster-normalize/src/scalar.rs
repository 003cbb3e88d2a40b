//! Scalar normalizers
//!
//! Pure functions turning one raw cell into a canonical value. None of them
//! fail: unreadable input degrades to an empty result and the
//! [`Parsed::was_malformed`] flag tells callers whether "empty" meant
//! "nothing there" or "could not read it".
//!
//! List-like cells are disambiguated in a fixed order:
//! 1. `<int>-<int>` range, expanded inclusively
//! 2. text starting with `[`, read as a JSON array
//! 3. comma-separated tokens

use once_cell::sync::Lazy;
use regex::Regex;
use roster_model::{Attributes, CellValue, Phase};
use serde_json::{Map, Value};

static RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*-\s*(\d+)\s*$").unwrap_or_else(|e| panic!("range pattern: {e}"))
});

/// Largest number of values a range expression may expand to by default
pub const DEFAULT_MAX_RANGE_SPAN: usize = 10_000;

/// Knobs shared by the list normalizers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Ranges covering more values than this are treated as malformed
    pub max_range_span: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_range_span: DEFAULT_MAX_RANGE_SPAN,
        }
    }
}

/// A normalized value plus whether the input had to be discarded
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parsed<T> {
    /// Best-effort normalized value
    pub value: T,
    /// Input was non-blank but not cleanly readable
    pub was_malformed: bool,
}

impl<T> Parsed<T> {
    /// Cleanly parsed value
    #[inline]
    #[must_use]
    pub fn clean(value: T) -> Self {
        Self {
            value,
            was_malformed: false,
        }
    }

    /// Value salvaged from malformed input
    #[inline]
    #[must_use]
    pub fn malformed(value: T) -> Self {
        Self {
            value,
            was_malformed: true,
        }
    }
}

/// Split a comma list into trimmed, non-empty strings
///
/// Lists pass through elementwise stringified. Any other non-text cell
/// yields an empty list.
#[must_use]
pub fn parse_comma_list(raw: &CellValue) -> Vec<String> {
    match raw {
        CellValue::Text(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        CellValue::TextList(items) => items
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        CellValue::NumberList(items) => items
            .iter()
            .map(|n| CellValue::Number(*n).to_text())
            .collect(),
        CellValue::Number(_) | CellValue::Object(_) | CellValue::Absent => Vec::new(),
    }
}

/// Numeric coercion of a single cell
///
/// Text is trimmed and read as a finite float; blank text is not a number.
#[must_use]
pub fn coerce_number(raw: &CellValue) -> Option<f64> {
    match raw {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => parse_finite(s),
        _ => None,
    }
}

/// Parse a range, JSON array or comma list of numbers
#[must_use]
pub fn parse_number_sequence(raw: &CellValue) -> Parsed<Vec<f64>> {
    parse_number_sequence_with(raw, &NormalizeOptions::default())
}

/// [`parse_number_sequence`] with explicit options
#[must_use]
pub fn parse_number_sequence_with(raw: &CellValue, options: &NormalizeOptions) -> Parsed<Vec<f64>> {
    #[allow(clippy::cast_precision_loss)]
    let from_range = |i: i64| i as f64;
    parse_sequence(raw, options, Some, from_range)
}

/// Parse a phase expression into integer phases
///
/// Same precedence as [`parse_number_sequence`]; elements must be whole
/// numbers.
#[must_use]
pub fn parse_phase_expression(raw: &CellValue) -> Parsed<Vec<Phase>> {
    parse_phase_expression_with(raw, &NormalizeOptions::default())
}

/// [`parse_phase_expression`] with explicit options
#[must_use]
pub fn parse_phase_expression_with(
    raw: &CellValue,
    options: &NormalizeOptions,
) -> Parsed<Vec<Phase>> {
    parse_sequence(raw, options, whole_number, |i| i)
}

/// Read an `AttributesJSON` cell
///
/// Blank cells yield `None`. Text that fails to parse is wrapped as
/// `{"message": text}` unless it contains `{`, `[` or `:`, in which case it
/// is kept verbatim as [`Attributes::Broken`].
#[must_use]
pub fn parse_attributes_json(raw: &CellValue) -> Option<Attributes> {
    if raw.is_blank() {
        return None;
    }
    let attributes = match raw {
        CellValue::Text(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => Attributes::Parsed(value),
            Err(_) if looks_like_json(text) => {
                tracing::trace!(%text, "attributes look like broken JSON");
                Attributes::Broken(text.clone())
            }
            Err(_) => {
                tracing::trace!(%text, "wrapping free-text attributes");
                let mut map = Map::new();
                map.insert("message".to_string(), Value::String(text.clone()));
                Attributes::Repaired(map)
            }
        },
        other => Attributes::Parsed(other.to_json()),
    };
    Some(attributes)
}

/// Heuristic separating pasted-but-broken JSON from a typed sentence
#[inline]
#[must_use]
pub fn looks_like_json(text: &str) -> bool {
    text.trim().contains(['{', '[', ':'])
}

/// Expand `<int>-<int>` if `text` is one
///
/// Returns `None` when the text is not a range. A reversed or oversized
/// range yields `Some(None)`.
fn expand_range(text: &str, options: &NormalizeOptions) -> Option<Option<Vec<i64>>> {
    let caps = RANGE.captures(text)?;
    let bounds = (caps[1].parse::<i64>(), caps[2].parse::<i64>());
    let (Ok(start), Ok(end)) = bounds else {
        return Some(None);
    };
    if start > end {
        return Some(None);
    }
    let span = usize::try_from(end - start).ok().and_then(|d| d.checked_add(1));
    match span {
        Some(span) if span <= options.max_range_span => Some(Some((start..=end).collect())),
        _ => Some(None),
    }
}

fn parse_sequence<T>(
    raw: &CellValue,
    options: &NormalizeOptions,
    element: impl Fn(f64) -> Option<T>,
    from_range: impl Fn(i64) -> T,
) -> Parsed<Vec<T>> {
    match raw {
        CellValue::Absent => Parsed::clean(Vec::new()),
        CellValue::Number(n) => match element(*n) {
            Some(v) => Parsed::clean(vec![v]),
            None => Parsed::malformed(Vec::new()),
        },
        CellValue::NumberList(items) => collect_strict(items.iter().map(|n| element(*n))),
        CellValue::TextList(items) => collect_strict(
            items
                .iter()
                .map(|t| parse_finite(t).and_then(&element)),
        ),
        CellValue::Object(_) => Parsed::malformed(Vec::new()),
        CellValue::Text(text) => parse_sequence_text(text, options, element, from_range),
    }
}

fn parse_sequence_text<T>(
    text: &str,
    options: &NormalizeOptions,
    element: impl Fn(f64) -> Option<T>,
    from_range: impl Fn(i64) -> T,
) -> Parsed<Vec<T>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Parsed::clean(Vec::new());
    }

    if let Some(range) = expand_range(trimmed, options) {
        return match range {
            Some(values) => Parsed::clean(values.into_iter().map(from_range).collect()),
            None => {
                tracing::trace!(text = trimmed, "range rejected");
                Parsed::malformed(Vec::new())
            }
        };
    }

    if trimmed.starts_with('[') {
        return match serde_json::from_str::<Vec<Value>>(trimmed) {
            Ok(items) => collect_strict(items.iter().map(|v| json_number(v).and_then(&element))),
            Err(e) => {
                tracing::trace!(text = trimmed, error = %e, "array parse failed");
                Parsed::malformed(Vec::new())
            }
        };
    }

    let values: Vec<T> = trimmed
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|t| parse_finite(t).and_then(&element))
        .collect();
    if values.is_empty() {
        Parsed::malformed(values)
    } else {
        Parsed::clean(values)
    }
}

/// Keep readable elements; flag the result if any were dropped
fn collect_strict<T>(items: impl Iterator<Item = Option<T>>) -> Parsed<Vec<T>> {
    let mut dropped = false;
    let values = items
        .filter_map(|item| {
            if item.is_none() {
                dropped = true;
            }
            item
        })
        .collect();
    Parsed {
        value: values,
        was_malformed: dropped,
    }
}

fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_finite(s),
        _ => None,
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[allow(clippy::cast_possible_truncation)]
fn whole_number(n: f64) -> Option<Phase> {
    (n.fract() == 0.0 && n.abs() < 9.0e15).then_some(n as Phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn text(s: &str) -> CellValue {
        CellValue::text(s)
    }

    #[test]
    fn comma_list_trims_and_drops_empty() {
        assert_eq!(parse_comma_list(&text(" a, b ,,c ")), vec!["a", "b", "c"]);
        assert!(parse_comma_list(&text("")).is_empty());
        assert!(parse_comma_list(&CellValue::Number(3.0)).is_empty());
        assert_eq!(
            parse_comma_list(&CellValue::NumberList(vec![1.0, 2.5])),
            vec!["1", "2.5"]
        );
    }

    #[test]
    fn number_sequence_branches() {
        assert_eq!(parse_number_sequence(&text("1-3")).value, vec![1.0, 2.0, 3.0]);
        assert_eq!(parse_number_sequence(&text("[2,4,5]")).value, vec![2.0, 4.0, 5.0]);
        assert_eq!(parse_number_sequence(&text("2,4,5")).value, vec![2.0, 4.0, 5.0]);
        assert_eq!(parse_number_sequence(&text(" 2 - 4 ")).value, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn number_sequence_malformed_is_empty() {
        let parsed = parse_number_sequence(&text("not-a-number"));
        assert!(parsed.value.is_empty());
        assert!(parsed.was_malformed);

        let parsed = parse_number_sequence(&text("[1, 2"));
        assert!(parsed.value.is_empty());
        assert!(parsed.was_malformed);
    }

    #[test]
    fn comma_branch_drops_non_numeric_tokens_silently() {
        let parsed = parse_number_sequence(&text("1, x, 3"));
        assert_eq!(parsed.value, vec![1.0, 3.0]);
        assert!(!parsed.was_malformed);
    }

    #[test]
    fn json_array_with_non_numeric_is_flagged() {
        let parsed = parse_number_sequence(&text(r#"[1, "a", 3]"#));
        assert_eq!(parsed.value, vec![1.0, 3.0]);
        assert!(parsed.was_malformed);
    }

    #[test]
    fn blank_is_clean_and_empty() {
        assert_eq!(parse_number_sequence(&text("  ")), Parsed::clean(vec![]));
        assert_eq!(parse_number_sequence(&CellValue::Absent), Parsed::clean(vec![]));
    }

    #[test]
    fn reversed_and_huge_ranges_are_malformed() {
        assert!(parse_number_sequence(&text("5-1")).was_malformed);
        let options = NormalizeOptions { max_range_span: 3 };
        let parsed = parse_number_sequence_with(&text("1-4"), &options);
        assert!(parsed.value.is_empty());
        assert!(parsed.was_malformed);
        assert_eq!(
            parse_number_sequence_with(&text("1-3"), &options).value,
            vec![1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn phase_expression_requires_whole_numbers() {
        assert_eq!(parse_phase_expression(&text("1-3")).value, vec![1, 2, 3]);
        assert_eq!(parse_phase_expression(&text("[1,3]")).value, vec![1, 3]);
        let parsed = parse_phase_expression(&text("[1, 2.5]"));
        assert_eq!(parsed.value, vec![1]);
        assert!(parsed.was_malformed);
        assert_eq!(parse_phase_expression(&CellValue::Number(4.0)).value, vec![4]);
        assert!(parse_phase_expression(&CellValue::Number(4.5)).was_malformed);
    }

    #[test]
    fn pre_parsed_lists() {
        let parsed = parse_phase_expression(&CellValue::NumberList(vec![1.0, 2.0]));
        assert_eq!(parsed, Parsed::clean(vec![1, 2]));
        let parsed = parse_number_sequence(&CellValue::TextList(vec!["1".into(), "b".into()]));
        assert_eq!(parsed.value, vec![1.0]);
        assert!(parsed.was_malformed);
    }

    #[test]
    fn attributes_auto_repair_free_text() {
        let attrs = parse_attributes_json(&text("vip customer")).unwrap();
        assert_eq!(attrs.stored_value(), json!({"message": "vip customer"}));
        assert!(matches!(attrs, Attributes::Repaired(_)));
    }

    #[test]
    fn attributes_broken_json_kept_verbatim() {
        let attrs = parse_attributes_json(&text("{bad json")).unwrap();
        assert_eq!(attrs, Attributes::Broken("{bad json".to_string()));
    }

    #[test]
    fn attributes_colon_sentence_is_treated_as_broken() {
        let attrs = parse_attributes_json(&text("Note: call back")).unwrap();
        assert!(matches!(attrs, Attributes::Broken(_)));
    }

    #[test]
    fn attributes_valid_and_blank() {
        let attrs = parse_attributes_json(&text(r#"{"tier": "gold"}"#)).unwrap();
        assert_eq!(attrs, Attributes::Parsed(json!({"tier": "gold"})));
        assert!(parse_attributes_json(&text("")).is_none());
        assert!(parse_attributes_json(&CellValue::Absent).is_none());
    }

    #[test]
    fn coerce_number_rules() {
        assert_eq!(coerce_number(&text(" 3 ")), Some(3.0));
        assert_eq!(coerce_number(&text("NaN")), None);
        assert_eq!(coerce_number(&text("")), None);
        assert_eq!(coerce_number(&text("abc")), None);
        assert_eq!(coerce_number(&CellValue::Number(2.5)), Some(2.5));
    }

    proptest! {
        #[test]
        fn prop_range_expands_inclusively(start in 0i64..500, len in 0i64..200) {
            let end = start + len;
            let parsed = parse_phase_expression(&CellValue::text(format!("{start}-{end}")));
            prop_assert!(!parsed.was_malformed);
            prop_assert_eq!(parsed.value.len() as i64, len + 1);
            prop_assert_eq!(parsed.value.first().copied(), Some(start));
            prop_assert_eq!(parsed.value.last().copied(), Some(end));
            prop_assert!(parsed.value.windows(2).all(|w| w[1] == w[0] + 1));
        }

        #[test]
        fn prop_comma_list_never_yields_blank_items(input in ".{0,40}") {
            let items = parse_comma_list(&CellValue::text(input));
            prop_assert!(items.iter().all(|i| !i.is_empty() && i.trim() == i.as_str()));
        }

        #[test]
        fn prop_number_sequence_never_panics(input in ".{0,40}") {
            let _ = parse_number_sequence(&CellValue::text(input));
        }
    }
}
