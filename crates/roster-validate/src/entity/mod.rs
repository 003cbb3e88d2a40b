//! Per-entity validators
//!
//! Each validator sees the whole normalized collection of its kind, since
//! some checks need collection context. Structural checks that only need the
//! schema live in [`structural`].

use roster_model::{format_number, ErrorCategory, Field, ValidationError};

mod client;
pub mod structural;
mod task;
mod worker;

pub use client::ClientValidator;
pub use structural::{check_duplicate_ids, check_required_columns, check_required_fields};
pub use task::TaskValidator;
pub use worker::WorkerValidator;

/// Validator over one entity kind's typed collection
pub trait EntityValidator: Send + Sync {
    /// Record type produced by the row mapper
    type Record;

    /// Check every record; row indices follow collection order
    fn validate(&self, records: &[Self::Record]) -> Vec<ValidationError>;
}

/// Allowed domain of an integer column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntegerDomain {
    /// Inclusive range
    Between(f64, f64),
    /// Inclusive lower bound
    AtLeast(f64),
}

impl IntegerDomain {
    fn contains(self, n: f64) -> bool {
        if n.fract() != 0.0 {
            return false;
        }
        match self {
            Self::Between(lo, hi) => (lo..=hi).contains(&n),
            Self::AtLeast(lo) => n >= lo,
        }
    }

    fn describe(self, column: &str) -> String {
        match self {
            Self::Between(lo, hi) => format!(
                "{column} must be between {} and {}",
                format_number(lo),
                format_number(hi)
            ),
            Self::AtLeast(lo) => format!("{column} must be at least {}", format_number(lo)),
        }
    }
}

/// Range check shared by every numeric column
///
/// Blank values are skipped. Non-numeric, fractional and out-of-domain
/// values all produce the same error.
pub(crate) fn check_integer_domain(
    field: &Field<f64>,
    row: usize,
    column: &str,
    domain: IntegerDomain,
) -> Option<ValidationError> {
    let value = match field {
        Field::Missing | Field::Empty => return None,
        Field::Value(n) if domain.contains(*n) => return None,
        Field::Value(n) => roster_model::CellValue::Number(*n).to_json(),
        Field::Invalid(raw) => raw.to_json(),
    };
    Some(
        ValidationError::row(ErrorCategory::Range, row, column, domain.describe(column))
            .with_value(value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_model::CellValue;

    #[test]
    fn domain_rules() {
        let d = IntegerDomain::Between(1.0, 5.0);
        assert!(d.contains(1.0));
        assert!(d.contains(5.0));
        assert!(!d.contains(0.0));
        assert!(!d.contains(6.0));
        assert!(!d.contains(2.5));
        assert!(IntegerDomain::AtLeast(0.0).contains(0.0));
        assert!(!IntegerDomain::AtLeast(1.0).contains(0.0));
    }

    #[test]
    fn messages() {
        assert_eq!(
            IntegerDomain::Between(1.0, 5.0).describe("PriorityLevel"),
            "PriorityLevel must be between 1 and 5"
        );
        assert_eq!(
            IntegerDomain::AtLeast(1.0).describe("Duration"),
            "Duration must be at least 1"
        );
    }

    #[test]
    fn non_numeric_and_out_of_range_share_one_error_kind() {
        let domain = IntegerDomain::AtLeast(1.0);
        let a = check_integer_domain(&Field::Value(0.0), 0, "Duration", domain).unwrap();
        let b = check_integer_domain(
            &Field::Invalid(CellValue::text("soon")),
            0,
            "Duration",
            domain,
        )
        .unwrap();
        assert_eq!(a.category, b.category);
        assert_eq!(a.message, b.message);
        assert!(check_integer_domain(&Field::Empty, 0, "Duration", domain).is_none());
    }
}
