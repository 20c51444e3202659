//! Differences reported by a comparison.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::table::Table;

/// One detected discrepancy between two documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Difference {
    /// A leaf value differs at a dotted field path.
    Field {
        field: String,
        doc1_value: Value,
        doc2_value: Value,
    },
    /// Extracted text comparison. Always present, even for identical text.
    Text {
        field: String,
        similarity: f64,
        diff: Vec<String>,
    },
    /// Per table-pair outcomes.
    Tables {
        field: String,
        table_differences: Vec<TableDifference>,
    },
}

impl Difference {
    /// The field this difference is reported under.
    pub fn field(&self) -> &str {
        match self {
            Self::Field { field, .. } | Self::Text { field, .. } | Self::Tables { field, .. } => {
                field
            }
        }
    }
}

/// Outcome for one matched table pair, or for one unmatched table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDifference {
    /// Index of the table in doc1, if doc1 holds one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc1_index: Option<usize>,
    /// Index of the table in doc2, if doc2 holds one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc2_index: Option<usize>,
    #[serde(flatten)]
    pub outcome: TableOutcome,
}

impl TableDifference {
    /// A matched pair.
    pub fn matched(doc1_index: usize, doc2_index: usize, outcome: TableOutcome) -> Self {
        Self {
            doc1_index: Some(doc1_index),
            doc2_index: Some(doc2_index),
            outcome,
        }
    }

    /// A doc1 table with no counterpart.
    pub fn only_in_doc1(index: usize, table: &Table) -> Self {
        Self {
            doc1_index: Some(index),
            doc2_index: None,
            outcome: TableOutcome::OnlyInDoc1 {
                header: table.header(),
                table: table.clone(),
            },
        }
    }

    /// A doc2 table with no counterpart.
    pub fn only_in_doc2(index: usize, table: &Table) -> Self {
        Self {
            doc1_index: None,
            doc2_index: Some(index),
            outcome: TableOutcome::OnlyInDoc2 {
                header: table.header(),
                table: table.clone(),
            },
        }
    }

    /// Returns `true` if this record pairs a doc1 table with a doc2 table.
    pub fn is_matched(&self) -> bool {
        self.doc1_index.is_some() && self.doc2_index.is_some()
    }
}

/// Classification of a table pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TableOutcome {
    /// Same header and the same set of body rows, ignoring order.
    ContentEquivalent {
        header: Vec<String>,
        content_equivalent: bool,
    },
    /// Flattened cell sets overlap above the similar-content threshold.
    SimilarContent {
        doc1_header: Vec<String>,
        doc2_header: Vec<String>,
        similarity: f64,
        cell_overlap: f64,
        doc1_table: Table,
        doc2_table: Table,
    },
    /// Matched but different enough to warrant a line diff.
    Diverged {
        doc1_header: Vec<String>,
        doc2_header: Vec<String>,
        diff: Vec<String>,
    },
    OnlyInDoc1 {
        header: Vec<String>,
        table: Table,
    },
    OnlyInDoc2 {
        header: Vec<String>,
        table: Table,
    },
}

impl TableOutcome {
    /// Short label used in summaries and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ContentEquivalent { .. } => "content-equivalent",
            Self::SimilarContent { .. } => "similar-content",
            Self::Diverged { .. } => "diverged",
            Self::OnlyInDoc1 { .. } => "only-in-doc1",
            Self::OnlyInDoc2 { .. } => "only-in-doc2",
        }
    }
}
