//! Comparison engine for extracted documents.
//!
//! Compares two [`DocumentRecord`]s (text, tables, metadata) and produces a
//! [`ComparisonResult`] with a similarity score and an ordered list of
//! differences. The engine is synchronous and holds no state between
//! comparisons.
//!
//! # Stages
//!
//! - [`structural_diff`] -- Field-by-field diff of the records
//! - [`text_diff`] -- Character similarity ratio and line-level unified diff
//! - [`reconstruct`] -- Table recovery from plain text
//! - [`table_match`] -- Table pairing and classification
//! - [`comparator`] -- Runs the stages and scores the result
//!
//! ```
//! use doccmp_engine::compare;
//! use doccmp_types::DocumentRecord;
//! use serde_json::json;
//!
//! let doc1 = DocumentRecord::try_from(json!({"id": "1", "extractedText": "A B C"})).unwrap();
//! let doc2 = DocumentRecord::try_from(json!({"id": "2", "extractedText": "A B D"})).unwrap();
//! let report = compare(&doc1, &doc2).unwrap().result;
//! assert!(report.text_similarity > 0.5);
//! ```

pub mod assignment;
pub mod comparator;
pub mod config;
pub mod error;
pub mod reconstruct;
pub mod structural_diff;
pub mod table_match;
pub mod text_diff;

pub use comparator::{compare, Comparator, Comparison};
pub use config::{CompareConfig, MatchOptions, MatchStrategy, TextDiffOptions};
pub use error::{CompareError, CompareResult, DocumentSide};
pub use reconstruct::{
    merge_reconstructed, reconstruct_tables, reconstruct_tables_if_needed, Reconstruction,
};
pub use structural_diff::{diff_structures, diff_structures_ignoring};
pub use table_match::{match_tables, table_similarity};
pub use text_diff::{diff_text, TextComparison};

pub use doccmp_types::{ComparisonResult, DocumentRecord};
