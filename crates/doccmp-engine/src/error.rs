//! Error types for the comparison engine.

use std::fmt;

use doccmp_types::ModelError;

/// Which input document an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentSide {
    Doc1,
    Doc2,
}

impl fmt::Display for DocumentSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doc1 => f.write_str("doc1"),
            Self::Doc2 => f.write_str("doc2"),
        }
    }
}

/// Errors that can occur during a comparison.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// One of the input records holds a malformed field.
    #[error("{side}: {source}")]
    Document {
        side: DocumentSide,
        #[source]
        source: ModelError,
    },
}

impl CompareError {
    pub(crate) fn document(side: DocumentSide) -> impl FnOnce(ModelError) -> Self {
        move |source| Self::Document { side, source }
    }
}

/// Convenience alias for comparison results.
pub type CompareResult<T> = Result<T, CompareError>;
