use pretty_assertions::assert_eq;
use roster_cli::{run_validate, ValidateArgs};
use roster_model::Workbook;
use roster_test_utils::{client_row, valid_workbook};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn snapshot_file(workbook: &Workbook) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(workbook.to_json_string().unwrap().as_bytes())
        .unwrap();
    file
}

#[test]
fn test_valid_snapshot_prints_valid() {
    let file = snapshot_file(&valid_workbook());
    let args = ValidateArgs {
        snapshot: file.path().to_path_buf(),
        ..ValidateArgs::default()
    };
    let mut out = Vec::new();
    assert!(run_validate(&args, &mut out).unwrap());
    assert_eq!(String::from_utf8(out).unwrap(), "Workbook is valid\n");
}

#[test]
fn test_json_report_with_normalized_view() {
    let workbook = valid_workbook().with_sheet("Clients 2", vec![client_row("C1", "A", 0.0, "")]);
    let file = snapshot_file(&workbook);
    let args = ValidateArgs {
        snapshot: file.path().to_path_buf(),
        json: true,
        emit_normalized: true,
        ..ValidateArgs::default()
    };
    let mut out = Vec::new();
    assert!(!run_validate(&args, &mut out).unwrap());

    let value: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["isValid"], json!(false));
    assert_eq!(value["errors"][0]["sheetName"], json!("Clients 2"));
    assert_eq!(value["normalized"]["clients"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["normalized"]["workers"][0]["AvailableSlots"], json!([1, 2, 3]));
}

#[test]
fn test_write_repaired_snapshot() {
    let workbook = Workbook::new().with_sheet(
        "Clients",
        vec![client_row("C1", "A", 1.0, "").with("AttributesJSON", "call me")],
    );
    let file = snapshot_file(&workbook);
    let dir = tempdir().unwrap();
    let repaired = dir.path().join("repaired.json");
    let args = ValidateArgs {
        snapshot: file.path().to_path_buf(),
        write_repaired: Some(repaired.clone()),
        ..ValidateArgs::default()
    };
    assert!(run_validate(&args, &mut Vec::new()).unwrap());

    let written = Workbook::from_file(&repaired).unwrap();
    let cell = written.sheet("Clients").unwrap()[0]
        .get("AttributesJSON")
        .map(|c| c.to_json());
    assert_eq!(cell, Some(json!({"message": "call me"})));
}

#[test]
fn test_config_file_is_applied() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[sheet_prefixes]\nclient = \"acct\"").unwrap();
    let workbook = Workbook::new().with_sheet("Acct list", vec![client_row("C1", "A", 9.0, "")]);
    let file = snapshot_file(&workbook);
    let args = ValidateArgs {
        snapshot: file.path().to_path_buf(),
        config: Some(config.path().to_path_buf()),
        ..ValidateArgs::default()
    };
    let mut out = Vec::new();
    assert!(!run_validate(&args, &mut out).unwrap());
    assert!(String::from_utf8(out).unwrap().contains("Acct list"));
}

#[test]
fn test_unreadable_snapshot_is_an_error() {
    let dir = tempdir().unwrap();
    let args = ValidateArgs {
        snapshot: dir.path().join("missing.json"),
        ..ValidateArgs::default()
    };
    let err = run_validate(&args, &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("missing.json"));
}

#[test]
fn test_wrong_shape_snapshot_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[1, 2, 3]").unwrap();
    let args = ValidateArgs {
        snapshot: file.path().to_path_buf(),
        ..ValidateArgs::default()
    };
    assert!(run_validate(&args, &mut Vec::new()).is_err());
}
