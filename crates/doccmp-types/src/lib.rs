//! Data model for the doccmp comparison engine.
//!
//! Everything the engine reads or produces lives here, so that callers
//! (persistence layers, HTTP handlers, the CLI) can share the types without
//! pulling in the engine itself.
//!
//! # Key Types
//!
//! - [`DocumentRecord`] -- One extracted document (text, tables, metadata)
//! - [`Table`] -- Rows of string cells; the first row is the header
//! - [`Difference`] -- One detected discrepancy (field, text, or table set)
//! - [`TableDifference`] / [`TableOutcome`] -- Per table-pair classification
//! - [`ComparisonResult`] -- The full report for one comparison

pub mod difference;
pub mod document;
pub mod error;
pub mod result;
pub mod table;

pub use difference::{Difference, TableDifference, TableOutcome};
pub use document::DocumentRecord;
pub use error::{ModelError, ModelResult};
pub use result::ComparisonResult;
pub use table::{normalize_cell, Row, Table};
