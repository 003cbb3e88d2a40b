//! Testing utilities for the roster workspace
//!
//! Shared row builders and fixture workbooks.

#![allow(missing_docs)]

use roster_model::{CellValue, RawRow, Workbook};

pub fn client_row(
    id: &str,
    name: &str,
    priority: impl Into<CellValue>,
    requested_tasks: &str,
) -> RawRow {
    RawRow::new()
        .with("ClientID", id)
        .with("ClientName", name)
        .with("PriorityLevel", priority)
        .with("RequestedTaskIDs", requested_tasks)
}

pub fn worker_row(
    id: &str,
    name: &str,
    skills: &str,
    slots: impl Into<CellValue>,
    max_load: impl Into<CellValue>,
) -> RawRow {
    RawRow::new()
        .with("WorkerID", id)
        .with("WorkerName", name)
        .with("Skills", skills)
        .with("AvailableSlots", slots)
        .with("MaxLoadPerPhase", max_load)
}

pub fn task_row(
    id: &str,
    name: &str,
    duration: impl Into<CellValue>,
    skills: &str,
    phases: impl Into<CellValue>,
    max_concurrent: impl Into<CellValue>,
) -> RawRow {
    RawRow::new()
        .with("TaskID", id)
        .with("TaskName", name)
        .with("Duration", duration)
        .with("RequiredSkills", skills)
        .with("PreferredPhases", phases)
        .with("MaxConcurrent", max_concurrent)
}

pub fn valid_clients() -> Vec<RawRow> {
    vec![
        client_row("C1", "Acme", 3.0, "T1,T2"),
        client_row("C2", "Globex", 5.0, "T2"),
    ]
}

pub fn valid_workers() -> Vec<RawRow> {
    vec![
        worker_row("W1", "Ada", "coding,testing", "[1,2,3]", 2.0),
        worker_row("W2", "Grace", "design", "1-2", 1.0),
    ]
}

pub fn valid_tasks() -> Vec<RawRow> {
    vec![
        task_row("T1", "Build API", 1.0, "coding", "1-2", 1.0),
        task_row("T2", "Mockups", 1.0, "design", "[2]", 1.0),
    ]
}

/// Workbook that passes every check
pub fn valid_workbook() -> Workbook {
    Workbook::new()
        .with_sheet("Clients", valid_clients())
        .with_sheet("Workers", valid_workers())
        .with_sheet("Tasks", valid_tasks())
}

/// Build a workbook from inline JSON (object of arrays of objects)
pub fn workbook_from_json(value: serde_json::Value) -> Workbook {
    serde_json::from_value(value).expect("fixture workbook must be an object of row arrays")
}
