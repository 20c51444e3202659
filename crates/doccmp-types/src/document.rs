//! Document records as produced by the extraction layer.
//!
//! A record is kept as a raw JSON object rather than a fixed struct: the
//! structural differ walks whatever keys the extractor wrote, and the engine
//! reads only the few well-known fields through the accessors below.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, ModelResult};
use crate::table::Table;

/// Key of the document identifier.
pub const ID_FIELD: &str = "id";
/// Key of the original upload file name.
pub const FILE_NAME_FIELD: &str = "fileName";
/// Key of the extracted text.
pub const TEXT_FIELD: &str = "extractedText";
/// Key of the nested metadata object.
pub const METADATA_FIELD: &str = "metadata";
/// Key of the table list.
pub const TABLES_FIELD: &str = "tables";

/// The structured extraction result for one uploaded file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRecord(Map<String, Value>);

impl DocumentRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a top-level field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// The underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the record, returning the underlying JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// The document identifier. Numeric ids are rendered as text; a missing
    /// id is empty.
    pub fn id(&self) -> String {
        match self.0.get(ID_FIELD) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// The original file name, if recorded.
    pub fn file_name(&self) -> Option<&str> {
        self.0.get(FILE_NAME_FIELD).and_then(Value::as_str)
    }

    /// The extracted text. Missing or `null` text is empty.
    pub fn extracted_text(&self) -> ModelResult<&str> {
        match self.0.get(TEXT_FIELD) {
            None | Some(Value::Null) => Ok(""),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(ModelError::InvalidField {
                field: TEXT_FIELD.into(),
                expected: "a string",
            }),
        }
    }

    /// The nested metadata object, if present.
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.0.get(METADATA_FIELD).and_then(Value::as_object)
    }

    /// The authoritative table list. Missing or `null` tables are empty.
    pub fn tables(&self) -> ModelResult<Vec<Table>> {
        match self.0.get(TABLES_FIELD) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| Table::from_value(idx, item))
                .collect(),
            Some(_) => Err(ModelError::InvalidField {
                field: TABLES_FIELD.into(),
                expected: "an array of tables",
            }),
        }
    }

    /// A copy of this record with its `tables` field replaced.
    pub fn with_tables(&self, tables: &[Table]) -> Self {
        let mut map = self.0.clone();
        map.insert(
            TABLES_FIELD.into(),
            Value::Array(tables.iter().map(Table::to_value).collect()),
        );
        Self(map)
    }
}

impl From<Map<String, Value>> for DocumentRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for DocumentRecord {
    type Error = ModelError;

    fn try_from(value: Value) -> ModelResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ModelError::NotAnObject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> DocumentRecord {
        DocumentRecord::try_from(value).unwrap()
    }

    #[test]
    fn missing_fields_default() {
        let doc = DocumentRecord::new();
        assert_eq!(doc.id(), "");
        assert_eq!(doc.extracted_text().unwrap(), "");
        assert!(doc.tables().unwrap().is_empty());
        assert!(doc.metadata().is_none());
        assert!(doc.file_name().is_none());
    }

    #[test]
    fn reads_well_known_fields() {
        let doc = record(json!({
            "id": 7,
            "fileName": "a.pdf",
            "extractedText": "hello",
            "metadata": {"pageCount": 2},
            "tables": [[["Name", "Age"], ["Bob", 30]]]
        }));
        assert_eq!(doc.id(), "7");
        assert_eq!(doc.file_name(), Some("a.pdf"));
        assert_eq!(doc.extracted_text().unwrap(), "hello");
        assert_eq!(doc.metadata().unwrap()["pageCount"], json!(2));
        assert_eq!(doc.tables().unwrap()[0].rows()[1], vec!["Bob", "30"]);
    }

    #[test]
    fn wrongly_typed_fields_are_errors() {
        let doc = record(json!({"extractedText": 3, "tables": "none"}));
        assert!(matches!(
            doc.extracted_text(),
            Err(ModelError::InvalidField { .. })
        ));
        assert!(matches!(doc.tables(), Err(ModelError::InvalidField { .. })));
    }

    #[test]
    fn with_tables_leaves_original_untouched() {
        let doc = record(json!({"id": "d1", "tables": []}));
        let table = Table::from(vec![vec!["a", "b"], vec!["1", "2"]]);
        let updated = doc.with_tables(std::slice::from_ref(&table));

        assert!(doc.tables().unwrap().is_empty());
        assert_eq!(updated.tables().unwrap(), vec![table]);
        assert_eq!(updated.id(), "d1");
    }

    #[test]
    fn builder_inserts_fields() {
        let doc = DocumentRecord::new()
            .with_field(ID_FIELD, json!("d9"))
            .with_field(TEXT_FIELD, json!("body"));
        assert_eq!(doc.id(), "d9");
        assert_eq!(doc.extracted_text().unwrap(), "body");
        assert_eq!(doc.into_map().len(), 2);
    }

    #[test]
    fn non_object_is_rejected() {
        assert_eq!(
            DocumentRecord::try_from(json!([1, 2])).unwrap_err(),
            ModelError::NotAnObject
        );
    }
}
