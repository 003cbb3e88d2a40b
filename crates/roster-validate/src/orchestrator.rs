//! Validation orchestrator
//!
//! Classifies the sheets of a workbook snapshot, runs the per-sheet checks,
//! then the cross-entity checks once their prerequisite sheets exist, and
//! finally the extension rules.

use crate::cache::{CacheStats, SheetCache, SheetHash, SheetOutcome};
use crate::config::ValidatorConfig;
use crate::cross;
use crate::entity::{
    check_duplicate_ids, check_required_columns, check_required_fields, ClientValidator,
    EntityValidator, TaskValidator, WorkerValidator,
};
use crate::error::ConfigResult;
use crate::rules::{RuleContext, RuleRegistry};
use indexmap::IndexMap;
use roster_model::columns::ATTRIBUTES_JSON;
use roster_model::{
    Attributes, CellValue, Client, EntityKind, Field, RawRow, Task, ValidationError,
    ValidationReport, Workbook, Worker,
};
use roster_normalize::{MappedSheet, RowMapper};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Typed collections of the first sheet of each kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedWorkbook {
    /// Client rows
    pub clients: Vec<Client>,
    /// Worker rows
    pub workers: Vec<Worker>,
    /// Task rows
    pub tasks: Vec<Task>,
}

/// Run every per-sheet check on rows classified as `kind`
///
/// Errors carry no sheet name; the caller tags them.
#[must_use]
pub fn check_sheet(mapper: &RowMapper, kind: EntityKind, rows: &[RawRow]) -> SheetOutcome {
    let mut errors = check_required_columns(kind, rows);
    errors.extend(check_required_fields(kind, rows));
    errors.extend(check_duplicate_ids(kind, rows));

    let mapped = mapper.map_sheet(kind, rows);
    let mut repairs = Vec::new();
    match &mapped {
        MappedSheet::Clients(clients) => {
            errors.extend(ClientValidator::new().validate(clients));
            for (index, client) in clients.iter().enumerate() {
                if let Field::Value(Attributes::Repaired(map)) = &client.attributes {
                    repairs.push((index, CellValue::Object(map.clone())));
                }
            }
        }
        MappedSheet::Workers(workers) => errors.extend(WorkerValidator::new().validate(workers)),
        MappedSheet::Tasks(tasks) => errors.extend(TaskValidator::new().validate(tasks)),
    }

    SheetOutcome {
        errors,
        mapped,
        repairs,
    }
}

/// A classified sheet and its per-sheet outcome
struct SheetRun {
    name: String,
    kind: EntityKind,
    outcome: Arc<SheetOutcome>,
}

/// Workbook validator
///
/// Holds configuration, extension rules and the optional per-sheet cache.
/// Cheap to reuse across snapshots; reuse is what makes the cache useful.
#[derive(Debug)]
pub struct Validator {
    config: ValidatorConfig,
    mapper: RowMapper,
    rules: RuleRegistry,
    cache: Option<SheetCache>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::build(ValidatorConfig::default())
    }
}

impl Validator {
    /// Create validator from a checked configuration
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`](crate::ConfigError::Invalid) if the
    /// configuration fails [`ValidatorConfig::validate`].
    pub fn new(config: ValidatorConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Validator with default settings and no cache
    #[must_use]
    pub fn uncached() -> Self {
        Self::build(ValidatorConfig::default().with_cache(false))
    }

    fn build(config: ValidatorConfig) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| SheetCache::new(config.cache.max_sheets));
        Self {
            mapper: RowMapper::with_options(config.normalize_options()),
            rules: RuleRegistry::default(),
            cache,
            config,
        }
    }

    /// Replace the extension rules
    #[must_use]
    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Registered extension rules
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Mutable access to the extension rules
    #[inline]
    pub fn rules_mut(&mut self) -> &mut RuleRegistry {
        &mut self.rules
    }

    /// Cache statistics, `None` when caching is disabled
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(SheetCache::stats)
    }

    /// Kind of every recognized sheet, in workbook order
    #[must_use]
    pub fn classify_sheets(&self, workbook: &Workbook) -> IndexMap<String, EntityKind> {
        workbook
            .sheet_names()
            .filter_map(|name| self.config.classify(name).map(|kind| (name.to_string(), kind)))
            .collect()
    }

    /// Validate a full snapshot
    ///
    /// Free-text `AttributesJSON` cells are rewritten in place to their
    /// repaired `{"message": ...}` form; every other cell is left untouched.
    /// Running this twice on the same snapshot yields the same error list.
    pub fn validate_all(&self, workbook: &mut Workbook) -> ValidationReport {
        let runs = self.run_sheets(workbook);

        let mut errors: Vec<ValidationError> = Vec::new();
        for run in &runs {
            errors.extend(
                run.outcome
                    .errors
                    .iter()
                    .cloned()
                    .map(|e| e.in_sheet(run.name.as_str())),
            );
        }

        for run in &runs {
            if run.outcome.repairs.is_empty() {
                continue;
            }
            if let Some(rows) = workbook.sheet_mut(&run.name) {
                for (index, value) in &run.outcome.repairs {
                    if let Some(row) = rows.get_mut(*index) {
                        row.replace(ATTRIBUTES_JSON, value.clone());
                    }
                }
                debug!(sheet = %run.name, repaired = run.outcome.repairs.len(), "attributes repaired");
            }
        }

        let primary = primary_sheets(&runs);
        let clients = primary.client.map(|r| (r, r.outcome.mapped.clients().unwrap_or_default()));
        let workers = primary.worker.map(|r| (r, r.outcome.mapped.workers().unwrap_or_default()));
        let tasks = primary.task.map(|r| (r, r.outcome.mapped.tasks().unwrap_or_default()));

        if let (Some((client_run, clients)), Some((task_run, tasks))) = (clients, tasks) {
            debug!(clients = %client_run.name, tasks = %task_run.name, "running task reference check");
            errors.extend(retag(cross::check_task_references(clients, tasks), client_run));
        }
        if let Some((worker_run, workers)) = workers {
            debug!(workers = %worker_run.name, "running worker overload check");
            errors.extend(retag(cross::check_worker_overload(workers), worker_run));
        }
        if let (Some((worker_run, workers)), Some((task_run, tasks))) = (workers, tasks) {
            debug!(workers = %worker_run.name, tasks = %task_run.name, "running capacity checks");
            errors.extend(retag(cross::check_skill_coverage(workers, tasks), task_run));
            errors.extend(retag(cross::check_max_concurrency(workers, tasks), task_run));
            errors.extend(retag(cross::check_phase_saturation(workers, tasks), task_run));
        }

        let ctx = RuleContext {
            clients: clients.map(|(_, c)| c),
            workers: workers.map(|(_, w)| w),
            tasks: tasks.map(|(_, t)| t),
        };
        errors.extend(self.rules.run(&ctx));

        let report = ValidationReport::from_errors(errors);
        info!(
            sheets = workbook.len(),
            classified = runs.len(),
            errors = report.errors.len(),
            is_valid = report.is_valid,
            "validation finished"
        );
        report
    }

    /// Typed view of the first sheet of each kind
    #[must_use]
    pub fn normalize(&self, workbook: &Workbook) -> NormalizedWorkbook {
        let runs = self.run_sheets(workbook);
        let primary = primary_sheets(&runs);
        NormalizedWorkbook {
            clients: primary
                .client
                .and_then(|r| r.outcome.mapped.clients())
                .map(<[Client]>::to_vec)
                .unwrap_or_default(),
            workers: primary
                .worker
                .and_then(|r| r.outcome.mapped.workers())
                .map(<[Worker]>::to_vec)
                .unwrap_or_default(),
            tasks: primary
                .task
                .and_then(|r| r.outcome.mapped.tasks())
                .map(<[Task]>::to_vec)
                .unwrap_or_default(),
        }
    }

    fn run_sheets(&self, workbook: &Workbook) -> Vec<SheetRun> {
        let mut runs = Vec::new();
        for (name, rows) in workbook.sheets() {
            let Some(kind) = self.config.classify(name) else {
                warn!(sheet = %name, "unrecognized sheet name, skipping");
                continue;
            };
            let outcome = self.sheet_outcome(kind, rows);
            debug!(
                sheet = %name,
                %kind,
                rows = rows.len(),
                errors = outcome.errors.len(),
                "sheet checked"
            );
            runs.push(SheetRun {
                name: name.to_string(),
                kind,
                outcome,
            });
        }
        runs
    }

    fn sheet_outcome(&self, kind: EntityKind, rows: &[RawRow]) -> Arc<SheetOutcome> {
        match &self.cache {
            Some(cache) => {
                let hash = SheetHash::compute(kind, rows);
                cache.get_or_insert_with(hash, || {
                    tracing::trace!(hash = %hash.short(), "sheet cache miss");
                    check_sheet(&self.mapper, kind, rows)
                })
            }
            None => Arc::new(check_sheet(&self.mapper, kind, rows)),
        }
    }
}

/// First sheet of each kind; later sheets of the same kind sit out the
/// cross-entity checks
#[derive(Default)]
struct PrimarySheets<'a> {
    client: Option<&'a SheetRun>,
    worker: Option<&'a SheetRun>,
    task: Option<&'a SheetRun>,
}

fn primary_sheets(runs: &[SheetRun]) -> PrimarySheets<'_> {
    let mut primary = PrimarySheets::default();
    for run in runs {
        let slot = match run.kind {
            EntityKind::Client => &mut primary.client,
            EntityKind::Worker => &mut primary.worker,
            EntityKind::Task => &mut primary.task,
        };
        if let Some(first) = *slot {
            warn!(
                sheet = %run.name,
                using = %first.name,
                kind = %run.kind,
                "second sheet of the same kind ignored for cross-sheet checks"
            );
        } else {
            *slot = Some(run);
        }
    }
    primary
}

fn retag(errors: Vec<ValidationError>, run: &SheetRun) -> impl Iterator<Item = ValidationError> + '_ {
    errors.into_iter().map(move |e| e.in_sheet(run.name.as_str()))
}

/// Validate a snapshot with default settings and no cache
pub fn validate_all(workbook: &mut Workbook) -> ValidationReport {
    Validator::uncached().validate_all(workbook)
}
