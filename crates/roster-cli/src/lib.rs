//! Roster CLI
//!
//! Command implementations behind the `roster` binary. Kept in a library so
//! they can be driven from tests with in-memory writers.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use roster_model::{CellValue, EntityKind, ValidationReport, Workbook};
use roster_normalize::normalize_cell_edit_with;
use roster_validate::{Validator, ValidatorConfig};
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Options of `roster validate`
#[derive(Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Workbook snapshot (JSON object of sheet name to rows)
    pub snapshot: PathBuf,
    /// Optional TOML validator config
    pub config: Option<PathBuf>,
    /// Print the report as JSON instead of a table
    pub json: bool,
    /// Write the snapshot here after `AttributesJSON` repair
    pub write_repaired: Option<PathBuf>,
    /// Also print the typed collections
    pub emit_normalized: bool,
}

/// Load the validator config, falling back to defaults without a path
///
/// # Errors
/// Fails if the file cannot be read or does not parse.
pub fn load_config(path: Option<&PathBuf>) -> Result<ValidatorConfig> {
    match path {
        Some(path) => ValidatorConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ValidatorConfig::default()),
    }
}

/// Run `roster validate`
///
/// Returns whether the snapshot is valid. I/O and parse failures are
/// errors; data problems are only reported.
///
/// # Errors
/// Fails if the snapshot or config cannot be read or parsed, or if output
/// cannot be written.
pub fn run_validate(args: &ValidateArgs, out: &mut impl Write) -> Result<bool> {
    let config = load_config(args.config.as_ref())?;
    let validator = Validator::new(config).context("invalid validator config")?;

    let mut workbook = Workbook::from_file(&args.snapshot)
        .with_context(|| format!("reading snapshot {}", args.snapshot.display()))?;
    info!(path = %args.snapshot.display(), sheets = workbook.len(), "snapshot loaded");

    let report = validator.validate_all(&mut workbook);

    if let Some(path) = &args.write_repaired {
        let text = workbook.to_json_string().context("serializing repaired snapshot")?;
        std::fs::write(path, text)
            .with_context(|| format!("writing repaired snapshot {}", path.display()))?;
        info!(path = %path.display(), "repaired snapshot written");
    }

    let normalized = if args.emit_normalized {
        Some(serde_json::to_value(validator.normalize(&workbook))?)
    } else {
        None
    };

    if args.json {
        let mut value = serde_json::to_value(&report)?;
        if let (Some(normalized), Value::Object(map)) = (normalized, &mut value) {
            map.insert("normalized".to_string(), normalized);
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        out.write_all(render_table(&report).as_bytes())?;
        if let Some(normalized) = normalized {
            writeln!(out, "{}", serde_json::to_string_pretty(&normalized)?)?;
        }
    }

    Ok(report.is_valid)
}

/// Human-readable report, one line per error plus a summary line
#[must_use]
pub fn render_table(report: &ValidationReport) -> String {
    let mut text = String::new();
    if report.errors.is_empty() {
        text.push_str("Workbook is valid\n");
        return text;
    }

    let sheet_width = report
        .errors
        .iter()
        .filter_map(|e| e.sheet_name.as_deref())
        .map(str::len)
        .max()
        .unwrap_or(0)
        .max("SHEET".len());
    let column_width = report
        .errors
        .iter()
        .map(|e| e.column.len())
        .max()
        .unwrap_or(0)
        .max("COLUMN".len());

    let _ = writeln!(
        text,
        "{:<sheet_width$}  {:>5}  {:<column_width$}  {:<11}  MESSAGE",
        "SHEET", "ROW", "COLUMN", "CATEGORY"
    );
    for error in &report.errors {
        let row = if error.is_sheet_level() {
            "-".to_string()
        } else {
            error.row_index().to_string()
        };
        let category = serde_json::to_value(error.category)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let _ = writeln!(
            text,
            "{:<sheet_width$}  {:>5}  {:<column_width$}  {:<11}  {}",
            error.sheet_name.as_deref().unwrap_or("-"),
            row,
            error.column,
            category,
            error.message
        );
    }
    let _ = writeln!(
        text,
        "\n{} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    );
    text
}

/// Run `roster normalize`
///
/// Prints the canonical JSON a cell edit would be stored as.
///
/// # Errors
/// Fails only if output cannot be written.
pub fn run_normalize(
    kind: EntityKind,
    column: &str,
    value: &str,
    config: &ValidatorConfig,
    out: &mut impl Write,
) -> Result<()> {
    let stored = normalize_cell_edit_with(
        kind,
        column,
        CellValue::text(value),
        &config.normalize_options(),
    );
    let result = json!({
        "kind": kind,
        "column": column,
        "value": stored.to_json(),
    });
    writeln!(out, "{}", serde_json::to_string(&result)?)?;
    Ok(())
}
