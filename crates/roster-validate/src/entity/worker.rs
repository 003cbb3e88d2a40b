use super::{check_integer_domain, EntityValidator, IntegerDomain};
use roster_model::columns::{AVAILABLE_SLOTS, MAX_LOAD_PER_PHASE};
use roster_model::{ErrorCategory, ValidationError, Worker};

/// Load range and slot format checks for workers
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerValidator;

impl WorkerValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EntityValidator for WorkerValidator {
    type Record = Worker;

    fn validate(&self, records: &[Worker]) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (row, worker) in records.iter().enumerate() {
            errors.extend(check_integer_domain(
                &worker.max_load_per_phase,
                row,
                MAX_LOAD_PER_PHASE,
                IntegerDomain::AtLeast(0.0),
            ));

            if let Some(slots) = worker.available_slots.value().filter(|s| s.malformed) {
                errors.push(
                    ValidationError::row(
                        ErrorCategory::Format,
                        row,
                        AVAILABLE_SLOTS,
                        format!("Malformed {AVAILABLE_SLOTS}: {}", slots.raw),
                    )
                    .with_value(slots.raw.to_json()),
                );
            }
        }
        errors
    }
}
