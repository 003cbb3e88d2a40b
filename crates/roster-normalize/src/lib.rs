//! Roster Normalize
//!
//! Turns heterogeneous spreadsheet cells into canonical values.
//!
//! # Overview
//!
//! - **Scalar normalizers**: comma lists, number sequences, phase
//!   expressions, attribute JSON ([`scalar`])
//! - **RowMapper**: raw row to typed [`Client`](roster_model::Client) /
//!   [`Worker`](roster_model::Worker) / [`Task`](roster_model::Task)
//! - **Cell edits**: canonical stored form for a single edited cell
//!
//! # Example
//!
//! ```rust
//! use roster_model::CellValue;
//! use roster_normalize::parse_number_sequence;
//!
//! let parsed = parse_number_sequence(&CellValue::text("1-3"));
//! assert_eq!(parsed.value, vec![1.0, 2.0, 3.0]);
//! assert!(!parsed.was_malformed);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod edit;
pub mod mapper;
pub mod scalar;

// Re-exports
pub use edit::{normalize_cell_edit, normalize_cell_edit_with};
pub use mapper::{map_row, MappedRow, MappedSheet, RowMapper};
pub use scalar::{
    coerce_number, looks_like_json, parse_attributes_json, parse_comma_list,
    parse_number_sequence, parse_number_sequence_with, parse_phase_expression,
    parse_phase_expression_with, NormalizeOptions, Parsed, DEFAULT_MAX_RANGE_SPAN,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
