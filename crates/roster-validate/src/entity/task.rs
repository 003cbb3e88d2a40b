use super::{check_integer_domain, EntityValidator, IntegerDomain};
use roster_model::columns::{DURATION, MAX_CONCURRENT, PREFERRED_PHASES};
use roster_model::{ErrorCategory, Task, ValidationError};

/// Duration, concurrency and phase format checks for tasks
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskValidator;

impl TaskValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EntityValidator for TaskValidator {
    type Record = Task;

    fn validate(&self, records: &[Task]) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (row, task) in records.iter().enumerate() {
            errors.extend(check_integer_domain(
                &task.duration,
                row,
                DURATION,
                IntegerDomain::AtLeast(1.0),
            ));
            errors.extend(check_integer_domain(
                &task.max_concurrent,
                row,
                MAX_CONCURRENT,
                IntegerDomain::AtLeast(0.0),
            ));

            if let Some(phases) = task.preferred_phases.value().filter(|s| s.malformed) {
                errors.push(
                    ValidationError::row(
                        ErrorCategory::Format,
                        row,
                        PREFERRED_PHASES,
                        format!("Malformed {PREFERRED_PHASES}: {}", phases.raw),
                    )
                    .with_value(phases.raw.to_json()),
                );
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_model::RawRow;
    use roster_normalize::RowMapper;
    use roster_test_utils::task_row;

    fn validate(rows: &[RawRow]) -> Vec<ValidationError> {
        let mapper = RowMapper::new();
        let tasks: Vec<_> = rows.iter().map(|r| mapper.map_task(r)).collect();
        TaskValidator::new().validate(&tasks)
    }

    #[test]
    fn duration_must_be_positive() {
        let errors = validate(&[task_row("T1", "A", 0.0, "x", "1", 1.0)]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].column, "Duration");
        assert!(validate(&[task_row("T1", "A", 1.0, "x", "1", 0.0)]).is_empty());
    }

    #[test]
    fn negative_concurrency() {
        let errors = validate(&[task_row("T1", "A", 2.0, "x", "1", -2.0)]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "MaxConcurrent must be at least 0");
    }

    #[test]
    fn unreadable_phases() {
        let errors = validate(&[task_row("T1", "A", 2.0, "x", "early", 1.0)]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].column, "PreferredPhases");
    }

    #[test]
    fn text_duration_is_a_range_error() {
        let errors = validate(&[task_row("T1", "A", "two", "x", "1-2", 1.0)]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, ErrorCategory::Range);
        assert_eq!(errors[0].value, Some(serde_json::json!("two")));
    }
}
