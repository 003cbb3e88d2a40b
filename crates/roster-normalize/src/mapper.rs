//! Row mapping
//!
//! The single boundary between untyped [`RawRow`]s and the typed
//! [`Client`] / [`Worker`] / [`Task`] records. Column names are matched
//! case-insensitively (first key encountered wins) and each column goes
//! through the normalizer its schema declares.

use crate::scalar::{
    coerce_number, parse_attributes_json, parse_comma_list, parse_number_sequence_with,
    parse_phase_expression_with, NormalizeOptions, Parsed,
};
use roster_model::columns::{
    ATTRIBUTES_JSON, AVAILABLE_SLOTS, CATEGORY, CLIENT_ID, CLIENT_NAME, DURATION, GROUP_TAG,
    MAX_CONCURRENT, MAX_LOAD_PER_PHASE, PREFERRED_PHASES, PRIORITY_LEVEL, QUALIFICATION_LEVEL,
    REQUESTED_TASK_IDS, REQUIRED_SKILLS, SKILLS, TASK_ID, TASK_NAME, WORKER_GROUP, WORKER_ID,
    WORKER_NAME,
};
use roster_model::{
    Attributes, CellValue, Client, EntityKind, Field, Phase, RawRow, Sequence,
    Task, Worker,
};

/// One typed row of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum MappedRow {
    /// Client row
    Client(Client),
    /// Worker row
    Worker(Worker),
    /// Task row
    Task(Task),
}

impl MappedRow {
    /// Kind of the mapped row
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Client(_) => EntityKind::Client,
            Self::Worker(_) => EntityKind::Worker,
            Self::Task(_) => EntityKind::Task,
        }
    }
}

/// A whole sheet mapped to one kind
#[derive(Debug, Clone, PartialEq)]
pub enum MappedSheet {
    /// Client rows
    Clients(Vec<Client>),
    /// Worker rows
    Workers(Vec<Worker>),
    /// Task rows
    Tasks(Vec<Task>),
}

impl MappedSheet {
    /// Kind of the mapped sheet
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Clients(_) => EntityKind::Client,
            Self::Workers(_) => EntityKind::Worker,
            Self::Tasks(_) => EntityKind::Task,
        }
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Clients(rows) => rows.len(),
            Self::Workers(rows) => rows.len(),
            Self::Tasks(rows) => rows.len(),
        }
    }

    /// Check if the sheet has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Client rows, if this is a client sheet
    #[must_use]
    pub fn clients(&self) -> Option<&[Client]> {
        match self {
            Self::Clients(rows) => Some(rows),
            _ => None,
        }
    }

    /// Worker rows, if this is a worker sheet
    #[must_use]
    pub fn workers(&self) -> Option<&[Worker]> {
        match self {
            Self::Workers(rows) => Some(rows),
            _ => None,
        }
    }

    /// Task rows, if this is a task sheet
    #[must_use]
    pub fn tasks(&self) -> Option<&[Task]> {
        match self {
            Self::Tasks(rows) => Some(rows),
            _ => None,
        }
    }
}

/// Maps raw rows onto typed records
#[derive(Debug, Clone, Copy, Default)]
pub struct RowMapper {
    options: NormalizeOptions,
}

impl RowMapper {
    /// Create mapper with default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create mapper with explicit options
    #[inline]
    #[must_use]
    pub fn with_options(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    #[inline]
    #[must_use]
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Map one row according to `kind`
    #[must_use]
    pub fn map_row(&self, kind: EntityKind, row: &RawRow) -> MappedRow {
        match kind {
            EntityKind::Client => MappedRow::Client(self.map_client(row)),
            EntityKind::Worker => MappedRow::Worker(self.map_worker(row)),
            EntityKind::Task => MappedRow::Task(self.map_task(row)),
        }
    }

    /// Map every row of a sheet according to `kind`
    #[must_use]
    pub fn map_sheet(&self, kind: EntityKind, rows: &[RawRow]) -> MappedSheet {
        match kind {
            EntityKind::Client => MappedSheet::Clients(rows.iter().map(|r| self.map_client(r)).collect()),
            EntityKind::Worker => MappedSheet::Workers(rows.iter().map(|r| self.map_worker(r)).collect()),
            EntityKind::Task => MappedSheet::Tasks(rows.iter().map(|r| self.map_task(r)).collect()),
        }
    }

    /// Map a client row
    #[must_use]
    pub fn map_client(&self, row: &RawRow) -> Client {
        Client {
            client_id: text_field(row, CLIENT_ID),
            client_name: text_field(row, CLIENT_NAME),
            priority_level: number_field(row, PRIORITY_LEVEL),
            requested_task_ids: list_field(row, REQUESTED_TASK_IDS),
            group_tag: text_field(row, GROUP_TAG),
            attributes: attributes_field(row, ATTRIBUTES_JSON),
        }
    }

    /// Map a worker row
    #[must_use]
    pub fn map_worker(&self, row: &RawRow) -> Worker {
        Worker {
            worker_id: text_field(row, WORKER_ID),
            worker_name: text_field(row, WORKER_NAME),
            skills: list_field(row, SKILLS),
            available_slots: sequence_field(row, AVAILABLE_SLOTS, |raw| {
                slots_from_numbers(parse_number_sequence_with(raw, &self.options))
            }),
            max_load_per_phase: number_field(row, MAX_LOAD_PER_PHASE),
            worker_group: text_field(row, WORKER_GROUP),
            qualification_level: any_field(row, QUALIFICATION_LEVEL),
        }
    }

    /// Map a task row
    #[must_use]
    pub fn map_task(&self, row: &RawRow) -> Task {
        Task {
            task_id: text_field(row, TASK_ID),
            task_name: text_field(row, TASK_NAME),
            category: text_field(row, CATEGORY),
            duration: number_field(row, DURATION),
            required_skills: list_field(row, REQUIRED_SKILLS),
            preferred_phases: sequence_field(row, PREFERRED_PHASES, |raw| {
                parse_phase_expression_with(raw, &self.options)
            }),
            max_concurrent: number_field(row, MAX_CONCURRENT),
        }
    }
}

/// Map one row with default options
#[must_use]
pub fn map_row(kind: EntityKind, row: &RawRow) -> MappedRow {
    RowMapper::new().map_row(kind, row)
}

/// Locate a column; `Missing` if absent, `Empty` if blank
fn locate<'a, T>(row: &'a RawRow, column: &str) -> Result<&'a CellValue, Field<T>> {
    match row.get(column) {
        None => Err(Field::Missing),
        Some(raw) if raw.is_blank() => Err(Field::Empty),
        Some(raw) => Ok(raw),
    }
}

fn text_field(row: &RawRow, column: &str) -> Field<String> {
    locate(row, column).map_or_else(|f| f, |raw| Field::Value(raw.to_text()))
}

fn number_field(row: &RawRow, column: &str) -> Field<f64> {
    locate(row, column).map_or_else(
        |f| f,
        |raw| coerce_number(raw).map_or_else(|| Field::Invalid(raw.clone()), Field::Value),
    )
}

fn list_field(row: &RawRow, column: &str) -> Field<Vec<String>> {
    locate(row, column).map_or_else(|f| f, |raw| Field::Value(parse_comma_list(raw)))
}

fn any_field(row: &RawRow, column: &str) -> Field<CellValue> {
    locate(row, column).map_or_else(|f| f, |raw| Field::Value(raw.clone()))
}

fn attributes_field(row: &RawRow, column: &str) -> Field<Attributes> {
    locate(row, column).map_or_else(
        |f| f,
        |raw| parse_attributes_json(raw).map_or(Field::Empty, Field::Value),
    )
}

fn sequence_field(
    row: &RawRow,
    column: &str,
    parse: impl FnOnce(&CellValue) -> Parsed<Vec<Phase>>,
) -> Field<Sequence<Phase>> {
    locate(row, column).map_or_else(
        |f| f,
        |raw| {
            let parsed = parse(raw);
            Field::Value(Sequence {
                items: parsed.value,
                malformed: parsed.was_malformed,
                raw: raw.clone(),
            })
        },
    )
}

/// Narrow a number sequence to whole phases; fractional slots are malformed
fn slots_from_numbers(parsed: Parsed<Vec<f64>>) -> Parsed<Vec<Phase>> {
    let mut malformed = parsed.was_malformed;
    let phases = parsed
        .value
        .into_iter()
        .filter_map(|n| {
            if n.fract() == 0.0 && n.abs() < 9.0e15 {
                #[allow(clippy::cast_possible_truncation)]
                let phase = n as Phase;
                Some(phase)
            } else {
                malformed = true;
                None
            }
        })
        .collect();
    Parsed {
        value: phases,
        was_malformed: malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn maps_client_with_odd_casing() {
        let row = RawRow::new()
            .with("clientid", "C1")
            .with("CLIENTNAME", "Acme")
            .with("prioritylevel", "3")
            .with("RequestedTaskIds", "T1, T2")
            .with("Unrelated", "x");
        let client = RowMapper::new().map_client(&row);
        assert_eq!(client.client_id, Field::Value("C1".to_string()));
        assert_eq!(client.priority_level, Field::Value(3.0));
        assert_eq!(client.requested_tasks(), ["T1", "T2"]);
        assert_eq!(client.group_tag, Field::Missing);
    }

    #[test]
    fn missing_differs_from_empty() {
        let row = RawRow::new().with("ClientName", "  ");
        let client = RowMapper::new().map_client(&row);
        assert_eq!(client.client_id, Field::Missing);
        assert_eq!(client.client_name, Field::Empty);
    }

    #[test]
    fn non_numeric_number_is_invalid() {
        let row = RawRow::new().with("Duration", "long");
        let task = RowMapper::new().map_task(&row);
        assert_eq!(task.duration, Field::Invalid(CellValue::text("long")));
    }

    #[test]
    fn numeric_id_is_string_coerced() {
        let row = RawRow::new().with("WorkerID", 7.0);
        let worker = RowMapper::new().map_worker(&row);
        assert_eq!(worker.worker_id, Field::Value("7".to_string()));
    }

    #[test]
    fn phases_expand_ranges() {
        let row = RawRow::new().with("PreferredPhases", "2-4");
        let task = RowMapper::new().map_task(&row);
        assert_eq!(task.phases(), [2, 3, 4]);
        assert!(!task.preferred_phases.value().unwrap().malformed);
    }

    #[test]
    fn options_bound_phase_ranges() {
        let mapper = RowMapper::with_options(NormalizeOptions { max_range_span: 2 });
        assert_eq!(mapper.options().max_range_span, 2);
        let task = mapper.map_task(&RawRow::new().with("PreferredPhases", "1-3"));
        assert!(task.phases().is_empty());
        assert!(task.preferred_phases.value().unwrap().malformed);
    }

    #[test]
    fn malformed_slots_are_flagged() {
        let row = RawRow::new().with("AvailableSlots", "soon");
        let worker = RowMapper::new().map_worker(&row);
        let slots = worker.available_slots.value().unwrap();
        assert!(slots.is_empty());
        assert!(slots.malformed);
        assert_eq!(slots.raw, CellValue::text("soon"));
    }

    #[test]
    fn fractional_slots_are_flagged() {
        let row = RawRow::new().with("AvailableSlots", "[1, 2.5]");
        let worker = RowMapper::new().map_worker(&row);
        assert_eq!(worker.slots(), [1]);
        assert!(worker.available_slots.value().unwrap().malformed);
    }

    #[test]
    fn attributes_are_read() {
        let row = RawRow::new().with("AttributesJSON", "vip customer");
        let client = RowMapper::new().map_client(&row);
        let attrs = client.attributes.value().unwrap();
        assert_eq!(attrs.stored_value(), json!({"message": "vip customer"}));
    }

    #[test]
    fn map_sheet_preserves_row_order() {
        let rows = vec![
            RawRow::new().with("TaskID", "T1"),
            RawRow::new().with("TaskID", "T2"),
        ];
        let MappedSheet::Tasks(tasks) = RowMapper::new().map_sheet(EntityKind::Task, &rows) else {
            panic!("expected tasks");
        };
        assert_eq!(tasks[1].task_id, Field::Value("T2".to_string()));
    }

    #[test]
    fn map_row_dispatches_on_kind() {
        let row = RawRow::new().with("WorkerID", "W1");
        assert_eq!(map_row(EntityKind::Worker, &row).kind(), EntityKind::Worker);
    }
}
