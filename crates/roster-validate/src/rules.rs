//! Extension rules run after the built-in cross-entity checks
//!
//! Circular task dependencies and custom business rules have no defined
//! semantics yet. They are registered as explicit no-ops so callers can
//! replace them without touching the orchestrator.

use roster_model::{Client, Task, ValidationError, Worker};
use std::fmt::{self, Debug, Formatter};

/// Collections available to a rule
///
/// A kind is `None` when the workbook has no sheet classified as that kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleContext<'a> {
    /// First client sheet
    pub clients: Option<&'a [Client]>,
    /// First worker sheet
    pub workers: Option<&'a [Worker]>,
    /// First task sheet
    pub tasks: Option<&'a [Task]>,
}

/// A check spanning several sheets
pub trait CrossSheetRule: Send + Sync + 'static {
    /// Stable rule name, used in logs
    fn name(&self) -> &str;

    /// Evaluate the rule
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError>;
}

/// Circular task dependency detection (not yet defined; reports nothing)
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularDependencyRule;

impl CrossSheetRule for CircularDependencyRule {
    fn name(&self) -> &str {
        "circular-dependency"
    }

    fn check(&self, _ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        Vec::new()
    }
}

/// Custom business rules (not yet defined; reports nothing)
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessRuleSet;

impl CrossSheetRule for BusinessRuleSet {
    fn name(&self) -> &str {
        "business-rules"
    }

    fn check(&self, _ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        Vec::new()
    }
}

/// Ordered set of extension rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn CrossSheetRule>>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(CircularDependencyRule);
        registry.register(BusinessRuleSet);
        registry
    }
}

impl Debug for RuleRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

impl RuleRegistry {
    /// Create registry with no rules
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule; rules run in registration order
    pub fn register<R: CrossSheetRule>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
    }

    /// Names of registered rules in run order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Number of registered rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rules are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule and concatenate the results
    #[must_use]
    pub fn run(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        self.rules
            .iter()
            .flat_map(|rule| {
                let errors = rule.check(ctx);
                tracing::trace!(rule = rule.name(), errors = errors.len(), "rule evaluated");
                errors
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_model::ErrorCategory;

    struct AlwaysFlag(&'static str);

    impl CrossSheetRule for AlwaysFlag {
        fn name(&self) -> &str {
            self.0
        }

        fn check(&self, _ctx: &RuleContext<'_>) -> Vec<ValidationError> {
            vec![ValidationError::sheet(ErrorCategory::Capacity, "", self.0)]
        }
    }

    #[test]
    fn builtin_rules_are_silent() {
        let registry = RuleRegistry::default();
        assert_eq!(registry.names(), vec!["circular-dependency", "business-rules"]);
        assert!(registry.run(&RuleContext::default()).is_empty());
    }

    #[test]
    fn custom_rules_append_in_order() {
        let mut registry = RuleRegistry::empty();
        registry.register(AlwaysFlag("first"));
        registry.register(AlwaysFlag("second"));
        let messages: Vec<_> = registry
            .run(&RuleContext::default())
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
