use super::{check_integer_domain, EntityValidator, IntegerDomain};
use roster_model::columns::{ATTRIBUTES_JSON, PRIORITY_LEVEL};
use roster_model::{Attributes, Client, ErrorCategory, Field, ValidationError};

/// Priority range and attribute JSON checks for clients
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientValidator;

impl ClientValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EntityValidator for ClientValidator {
    type Record = Client;

    fn validate(&self, records: &[Client]) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (row, client) in records.iter().enumerate() {
            errors.extend(check_integer_domain(
                &client.priority_level,
                row,
                PRIORITY_LEVEL,
                IntegerDomain::Between(1.0, 5.0),
            ));

            if let Field::Value(Attributes::Broken(text)) = &client.attributes {
                errors.push(
                    ValidationError::row(
                        ErrorCategory::Format,
                        row,
                        ATTRIBUTES_JSON,
                        format!("{ATTRIBUTES_JSON} is not valid JSON"),
                    )
                    .with_value(text.clone()),
                );
            }
        }
        errors
    }
}
