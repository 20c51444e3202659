use serde::{Deserialize, Serialize};

use crate::difference::{Difference, TableDifference};

/// The report for one comparison of two documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub doc1_id: String,
    pub doc2_id: String,
    /// Difference-count based score in `[0, 1]`.
    pub similarity_score: f64,
    /// Character-level similarity of the extracted text, in `[0, 1]`.
    pub text_similarity: f64,
    pub differences: Vec<Difference>,
    pub summary: String,
}

impl ComparisonResult {
    /// Field-level differences, in report order.
    pub fn field_differences(&self) -> impl Iterator<Item = &Difference> {
        self.differences
            .iter()
            .filter(|d| matches!(d, Difference::Field { .. }))
    }

    /// The text difference lines, if a text entry is present.
    pub fn text_diff(&self) -> Option<&[String]> {
        self.differences.iter().find_map(|d| match d {
            Difference::Text { diff, .. } => Some(diff.as_slice()),
            _ => None,
        })
    }

    /// Per table-pair outcomes, empty when no table entry is present.
    pub fn table_differences(&self) -> &[TableDifference] {
        self.differences
            .iter()
            .find_map(|d| match d {
                Difference::Tables {
                    table_differences, ..
                } => Some(table_differences.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}
