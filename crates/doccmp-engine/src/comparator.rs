//! The comparison orchestrator.
//!
//! Runs the structural, text, and table stages over two document records and
//! folds their differences into one [`ComparisonResult`].

use tracing::{debug, info};

use doccmp_types::document::{TABLES_FIELD, TEXT_FIELD};
use doccmp_types::{ComparisonResult, Difference, DocumentRecord, ModelResult, Table};

use crate::config::CompareConfig;
use crate::error::{CompareError, CompareResult, DocumentSide};
use crate::reconstruct::{self, Reconstruction};
use crate::structural_diff::diff_structures_ignoring;
use crate::table_match::match_tables;
use crate::text_diff::diff_text;

/// A comparison report plus any tables recovered along the way.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub result: ComparisonResult,
    /// Tables recovered from doc1's text, if reconstruction fired for it.
    pub doc1_recovered: Option<Vec<Table>>,
    /// Tables recovered from doc2's text, if reconstruction fired for it.
    pub doc2_recovered: Option<Vec<Table>>,
}

/// Compares document records. Holds only configuration, so one instance can
/// serve concurrent comparisons.
#[derive(Clone, Debug, Default)]
pub struct Comparator {
    config: CompareConfig,
}

impl Comparator {
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Effective tables of a document; see
    /// [`reconstruct::reconstruct_tables_if_needed`].
    pub fn reconstruct_tables_if_needed(
        &self,
        document: &DocumentRecord,
    ) -> ModelResult<Reconstruction> {
        reconstruct::reconstruct_tables_if_needed(document)
    }

    /// Compare two documents.
    pub fn compare(
        &self,
        doc1: &DocumentRecord,
        doc2: &DocumentRecord,
    ) -> CompareResult<Comparison> {
        let mut differences =
            diff_structures_ignoring(doc1.as_map(), doc2.as_map(), &self.config.ignored_fields);
        debug!(count = differences.len(), "field differences");

        let text1 = doc1
            .extracted_text()
            .map_err(CompareError::document(DocumentSide::Doc1))?;
        let text2 = doc2
            .extracted_text()
            .map_err(CompareError::document(DocumentSide::Doc2))?;
        let text = diff_text(text1, text2, &self.config.text);
        debug!(similarity = text.similarity, diff_lines = text.diff.len(), "text compared");
        differences.push(Difference::Text {
            field: TEXT_FIELD.into(),
            similarity: text.similarity,
            diff: text.diff,
        });

        let tables1 = self
            .reconstruct_tables_if_needed(doc1)
            .map_err(CompareError::document(DocumentSide::Doc1))?;
        let tables2 = self
            .reconstruct_tables_if_needed(doc2)
            .map_err(CompareError::document(DocumentSide::Doc2))?;

        let table_differences = match_tables(&tables1.tables, &tables2.tables, &self.config.tables);
        if !table_differences.is_empty() {
            differences.push(Difference::Tables {
                field: TABLES_FIELD.into(),
                table_differences,
            });
        }

        let similarity_score = similarity_score(differences.len());
        let summary = summarize(similarity_score, differences.len(), text.similarity);
        info!(
            doc1 = %doc1.id(),
            doc2 = %doc2.id(),
            score = similarity_score,
            differences = differences.len(),
            "documents compared"
        );

        Ok(Comparison {
            result: ComparisonResult {
                doc1_id: doc1.id(),
                doc2_id: doc2.id(),
                similarity_score,
                text_similarity: text.similarity,
                differences,
                summary,
            },
            doc1_recovered: recovered(tables1),
            doc2_recovered: recovered(tables2),
        })
    }
}

fn recovered(reconstruction: Reconstruction) -> Option<Vec<Table>> {
    reconstruction
        .reconstructed
        .then_some(reconstruction.tables)
}

/// `1 - n / (n + 1)`: 1 with no differences, tending to 0 as they grow.
/// Counts entries, not their weight.
pub fn similarity_score(differences: usize) -> f64 {
    let n = differences as f64;
    1.0 - n / (n + 1.0)
}

/// One-sentence summary of a comparison.
pub fn summarize(similarity_score: f64, differences: usize, text_similarity: f64) -> String {
    let head = match differences {
        0 => "Documents are identical.".to_string(),
        1 => format!(
            "Documents are {:.1}% similar with 1 difference found.",
            similarity_score * 100.0
        ),
        n => format!(
            "Documents are {:.1}% similar with {n} differences found.",
            similarity_score * 100.0
        ),
    };
    format!("{head} Text similarity: {:.1}%.", text_similarity * 100.0)
}

/// Compare two documents with the default configuration.
pub fn compare(doc1: &DocumentRecord, doc2: &DocumentRecord) -> CompareResult<Comparison> {
    Comparator::default().compare(doc1, doc2)
}
