//! Roster Model
//!
//! Shared vocabulary for the roster workspace.
//!
//! # Overview
//!
//! - **CellValue**: closed set of raw cell shapes delivered by a sheet reader
//! - **RawRow / Workbook**: order-preserving untyped snapshot
//! - **EntityKind / FieldSpec**: per-kind column schemas
//! - **Client / Worker / Task**: typed records with [`Field`] provenance
//! - **ValidationError / ValidationReport**: located problems reported back
//!
//! # Example
//!
//! ```rust
//! use roster_model::{CellValue, EntityKind, RawRow, Workbook};
//!
//! let row = RawRow::new().with("clientid", "C1").with("PriorityLevel", 3.0);
//! let workbook = Workbook::new().with_sheet("Clients 1", vec![row]);
//!
//! assert_eq!(EntityKind::classify("Clients 1"), Some(EntityKind::Client));
//! let rows = workbook.sheet("Clients 1").unwrap();
//! assert_eq!(rows[0].get("ClientID"), Some(&CellValue::text("C1")));
//! ```

#![warn(missing_docs)]

pub mod cell;
pub mod entity;
pub mod error;
pub mod row;
pub mod schema;

// Re-exports
pub use cell::{format_number, CellValue};
pub use entity::{Attributes, Client, Field, Phase, Sequence, Task, Worker};
pub use error::{
    ErrorCategory, RowRef, Severity, ValidationError, ValidationReport, WorkbookError,
    SHEET_LEVEL_ROW,
};
pub use row::{RawRow, Workbook};
pub use schema::{columns, EntityKind, FieldSpec, SemanticType, UnknownKind};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for roster data handling
    pub use crate::{
        columns, Attributes, CellValue, Client, EntityKind, ErrorCategory, Field, Phase, RawRow,
        RowRef, Sequence, Severity, Task, ValidationError, ValidationReport, Worker, Workbook,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
