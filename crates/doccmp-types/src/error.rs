use thiserror::Error;

/// Errors produced while reading a document record.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("document record must be a JSON object")]
    NotAnObject,

    #[error("field `{field}` has the wrong type: expected {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    #[error("table {table}, row {row}: expected an array of cells")]
    InvalidRow { table: usize, row: usize },

    #[error("table {table}, row {row}, column {column}: cell is not a primitive value")]
    InvalidCell {
        table: usize,
        row: usize,
        column: usize,
    },
}

pub type ModelResult<T> = Result<T, ModelError>;
