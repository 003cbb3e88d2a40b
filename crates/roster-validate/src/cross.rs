//! Cross-entity consistency checks
//!
//! Pure functions over fully normalized collections. Errors are tagged with
//! the logical sheet label (`Clients`, `Workers`, `Tasks`); the orchestrator
//! re-tags them with the sheet names actually uploaded.

use roster_model::columns::{
    MAX_CONCURRENT, MAX_LOAD_PER_PHASE, PREFERRED_PHASES, REQUESTED_TASK_IDS, REQUIRED_SKILLS,
};
use roster_model::{
    CellValue, Client, EntityKind, ErrorCategory, Field, Phase, Task, ValidationError, Worker,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

fn number_json(n: f64) -> Value {
    CellValue::Number(n).to_json()
}

#[allow(clippy::cast_precision_loss)]
fn count(n: usize) -> f64 {
    n as f64
}

/// Every requested task ID must name a known task
#[must_use]
pub fn check_task_references(clients: &[Client], tasks: &[Task]) -> Vec<ValidationError> {
    let known: HashSet<&str> = tasks
        .iter()
        .filter_map(|t| t.task_id.value())
        .map(|id| id.trim())
        .collect();

    let mut errors = Vec::new();
    for (row, client) in clients.iter().enumerate() {
        for id in client.requested_tasks() {
            if !known.contains(id.as_str()) {
                errors.push(
                    ValidationError::row(
                        ErrorCategory::Referential,
                        row,
                        REQUESTED_TASK_IDS,
                        format!("Unknown TaskID '{id}' in {REQUESTED_TASK_IDS}"),
                    )
                    .with_value(id.clone())
                    .in_sheet(EntityKind::Client.sheet_label()),
                );
            }
        }
    }
    debug!(clients = clients.len(), errors = errors.len(), "task reference check");
    errors
}

/// A worker cannot carry more per-phase load than it has slots
#[must_use]
pub fn check_worker_overload(workers: &[Worker]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (row, worker) in workers.iter().enumerate() {
        let Field::Value(max_load) = worker.max_load_per_phase else {
            continue;
        };
        let slots = worker.slots().len();
        if count(slots) < max_load {
            errors.push(
                ValidationError::row(
                    ErrorCategory::Capacity,
                    row,
                    MAX_LOAD_PER_PHASE,
                    format!(
                        "{MAX_LOAD_PER_PHASE} ({}) exceeds available slot count ({slots})",
                        roster_model::format_number(max_load)
                    ),
                )
                .with_value(number_json(max_load))
                .in_sheet(EntityKind::Worker.sheet_label()),
            );
        }
    }
    debug!(workers = workers.len(), errors = errors.len(), "worker overload check");
    errors
}

/// Every required skill must be offered by at least one worker
#[must_use]
pub fn check_skill_coverage(workers: &[Worker], tasks: &[Task]) -> Vec<ValidationError> {
    let offered: HashSet<&str> = workers
        .iter()
        .flat_map(Worker::skill_list)
        .map(String::as_str)
        .collect();

    let mut errors = Vec::new();
    for (row, task) in tasks.iter().enumerate() {
        for skill in task.skill_list() {
            if !offered.contains(skill.as_str()) {
                errors.push(
                    ValidationError::row(
                        ErrorCategory::Capacity,
                        row,
                        REQUIRED_SKILLS,
                        format!("No worker has required skill '{skill}'"),
                    )
                    .with_value(skill.clone())
                    .in_sheet(EntityKind::Task.sheet_label()),
                );
            }
        }
    }
    debug!(tasks = tasks.len(), errors = errors.len(), "skill coverage check");
    errors
}

/// Workers sharing at least one skill with `task`
#[must_use]
pub fn qualified_workers(task: &Task, workers: &[Worker]) -> usize {
    let required: HashSet<&str> = task.skill_list().iter().map(String::as_str).collect();
    workers
        .iter()
        .filter(|w| w.skill_list().iter().any(|s| required.contains(s.as_str())))
        .count()
}

/// `MaxConcurrent` may not exceed the number of qualified workers
#[must_use]
pub fn check_max_concurrency(workers: &[Worker], tasks: &[Task]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (row, task) in tasks.iter().enumerate() {
        let Field::Value(max_concurrent) = task.max_concurrent else {
            continue;
        };
        let qualified = qualified_workers(task, workers);
        if count(qualified) < max_concurrent {
            errors.push(
                ValidationError::row(
                    ErrorCategory::Capacity,
                    row,
                    MAX_CONCURRENT,
                    format!(
                        "{MAX_CONCURRENT} ({}) exceeds qualified workers ({qualified})",
                        roster_model::format_number(max_concurrent)
                    ),
                )
                .with_value(number_json(max_concurrent))
                .in_sheet(EntityKind::Task.sheet_label()),
            );
        }
    }
    debug!(tasks = tasks.len(), errors = errors.len(), "max concurrency check");
    errors
}

/// Aggregate demand and supply for one phase
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PhaseLoad {
    /// Sum of `Duration × MaxConcurrent` over tasks preferring the phase
    pub demand: f64,
    /// Sum of `MaxLoadPerPhase` over workers available in the phase
    pub supply: f64,
}

impl PhaseLoad {
    /// Check if demand exceeds supply
    #[inline]
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        self.demand > self.supply
    }
}

/// Per-phase totals in ascending phase order
///
/// Each worker contributes its full `MaxLoadPerPhase` to every phase it is
/// available in. Rows with a non-numeric load, duration or concurrency
/// contribute nothing.
#[must_use]
pub fn phase_loads(workers: &[Worker], tasks: &[Task]) -> BTreeMap<Phase, PhaseLoad> {
    let mut loads: BTreeMap<Phase, PhaseLoad> = BTreeMap::new();

    for worker in workers {
        if let Field::Value(max_load) = worker.max_load_per_phase {
            for &phase in worker.slots() {
                loads.entry(phase).or_default().supply += max_load;
            }
        }
    }

    for task in tasks {
        if let (Field::Value(duration), Field::Value(concurrent)) =
            (&task.duration, &task.max_concurrent)
        {
            let demand = duration * concurrent;
            for &phase in task.phases() {
                loads.entry(phase).or_default().demand += demand;
            }
        }
    }
    loads
}

/// One sheet-level error per phase whose demand exceeds supply
#[must_use]
pub fn check_phase_saturation(workers: &[Worker], tasks: &[Task]) -> Vec<ValidationError> {
    let errors: Vec<_> = phase_loads(workers, tasks)
        .into_iter()
        .filter(|(_, load)| load.is_saturated())
        .map(|(phase, load)| {
            let demand = roster_model::format_number(load.demand);
            let supply = roster_model::format_number(load.supply);
            ValidationError::sheet(
                ErrorCategory::Capacity,
                PREFERRED_PHASES,
                format!("Phase {phase} is oversubscribed: demand {demand} exceeds supply {supply}"),
            )
            .with_value(json!({
                "phase": phase,
                "demand": number_json(load.demand),
                "supply": number_json(load.supply),
            }))
            .in_sheet(EntityKind::Task.sheet_label())
        })
        .collect();
    debug!(errors = errors.len(), "phase saturation check");
    errors
}
