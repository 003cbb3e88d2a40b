//! Roster Validate
//!
//! Consistency checks over a client/worker/task workbook snapshot.
//!
//! # Pipeline
//!
//! ```text
//! Workbook → classify sheets → per-sheet checks → cross-entity checks → rules → ValidationReport
//!                                    ↑___________↓
//!                            SheetCache (Blake3 content hash)
//! ```
//!
//! # Example
//!
//! ```rust
//! use roster_model::{RawRow, Workbook};
//! use roster_validate::Validator;
//!
//! let client = RawRow::new()
//!     .with("ClientID", "C1")
//!     .with("ClientName", "Acme")
//!     .with("PriorityLevel", 7.0)
//!     .with("RequestedTaskIDs", "");
//! let mut workbook = Workbook::new().with_sheet("Clients", vec![client]);
//!
//! let report = Validator::default().validate_all(&mut workbook);
//! assert!(!report.is_valid);
//! assert_eq!(report.errors[0].column, "PriorityLevel");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod cross;
pub mod entity;
pub mod error;
pub mod orchestrator;
pub mod rules;

// Re-exports for convenience
pub use cache::{CacheStats, SheetCache, SheetHash, SheetOutcome};
pub use config::{CacheConfig, SheetPrefixes, ValidatorConfig};
pub use cross::{
    check_max_concurrency, check_phase_saturation, check_skill_coverage, check_task_references,
    check_worker_overload, phase_loads, PhaseLoad,
};
pub use entity::{ClientValidator, EntityValidator, TaskValidator, WorkerValidator};
pub use error::{ConfigError, ConfigResult};
pub use orchestrator::{check_sheet, validate_all, NormalizedWorkbook, Validator};
pub use rules::{BusinessRuleSet, CircularDependencyRule, CrossSheetRule, RuleContext, RuleRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
