//! Tables as plain rows of string cells.
//!
//! Cell values arrive as JSON primitives and are coerced to strings once, on
//! the way in, so every comparison downstream works on text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, ModelResult};

/// One table row.
pub type Row = Vec<String>;

/// An ordered sequence of rows. The first row is treated as the header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Create a table from rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Parse a table from its JSON form (an array of arrays of primitives).
    ///
    /// `index` is the table's position in the document and only feeds error
    /// locations.
    pub fn from_value(index: usize, value: &Value) -> ModelResult<Self> {
        let rows = value.as_array().ok_or_else(|| ModelError::InvalidField {
            field: format!("tables[{index}]"),
            expected: "an array of rows",
        })?;

        let mut parsed = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let cells = row.as_array().ok_or(ModelError::InvalidRow {
                table: index,
                row: row_idx,
            })?;
            let mut out = Vec::with_capacity(cells.len());
            for (col_idx, cell) in cells.iter().enumerate() {
                let text = cell_to_string(cell).ok_or(ModelError::InvalidCell {
                    table: index,
                    row: row_idx,
                    column: col_idx,
                })?;
                out.push(text);
            }
            parsed.push(out);
        }

        Ok(Self { rows: parsed })
    }

    /// JSON form of the table: an array of arrays of strings.
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| Value::Array(row.iter().cloned().map(Value::String).collect()))
                .collect(),
        )
    }

    /// All rows, header included.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The header as comparison key: first row, trimmed and lowercased.
    ///
    /// A table without rows has an empty header.
    pub fn header(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(|c| normalize_cell(c)).collect())
            .unwrap_or_default()
    }

    /// Rows after the header.
    pub fn body(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

impl From<Vec<Vec<&str>>> for Table {
    fn from(rows: Vec<Vec<&str>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }
}

/// Normalize a cell for comparison: trimmed and lowercased.
pub fn normalize_cell(cell: &str) -> String {
    cell.trim().to_lowercase()
}

/// Coerce a primitive JSON value to its cell text. `null` becomes empty.
fn cell_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_primitive_cells() {
        let table = Table::from_value(0, &json!([["Name", "Age"], ["Bob", 30], [true, null]])).unwrap();
        assert_eq!(table.rows()[1], vec!["Bob", "30"]);
        assert_eq!(table.rows()[2], vec!["true", ""]);
    }

    #[test]
    fn nested_cell_is_located() {
        let err = Table::from_value(2, &json!([["a"], ["b", {"x": 1}]])).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidCell {
                table: 2,
                row: 1,
                column: 1
            }
        );
    }

    #[test]
    fn row_must_be_array() {
        let err = Table::from_value(0, &json!([["a"], "oops"])).unwrap_err();
        assert_eq!(err, ModelError::InvalidRow { table: 0, row: 1 });
    }

    #[test]
    fn header_is_normalized() {
        let table = Table::from(vec![vec!["  Name ", "AGE"], vec!["Bob", "30"]]);
        assert_eq!(table.header(), vec!["name", "age"]);
        assert_eq!(table.body().len(), 1);
    }

    #[test]
    fn empty_table_has_empty_header_and_body() {
        let table = Table::default();
        assert!(table.header().is_empty());
        assert!(table.body().is_empty());
    }

    #[test]
    fn to_value_round_trips_strings() {
        let table = Table::from(vec![vec!["a", "b"], vec!["1", "2"]]);
        assert_eq!(Table::from_value(0, &table.to_value()).unwrap(), table);
    }
}
