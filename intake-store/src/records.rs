//! Wire types for the record store's REST surface.
//!
//! A record on the wire is a mapping from field id to `{"value": ...}`.
//! The typed accessors here fail soft (`Option`); strongly typed domain
//! structs are built from records once, at the client boundary.

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Store-assigned record identifier
pub type RecordId = i64;

/// A single field cell: `{"value": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: Value,
}

impl FieldValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// String content of a string or numeric value
    pub fn as_text(&self) -> Option<String> {
        match &self.value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }

    /// Integer content of a numeric or numeric-string value
    pub fn as_i64(&self) -> Option<i64> {
        match &self.value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        self.value.as_object()
    }
}

/// A record: field id → field value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<u32, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, builder style
    pub fn with(mut self, field_id: u32, value: impl Into<Value>) -> Self {
        self.set(field_id, value);
        self
    }

    pub fn set(&mut self, field_id: u32, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(field_id, FieldValue::new(value));
        self
    }

    pub fn get(&self, field_id: u32) -> Option<&FieldValue> {
        self.fields.get(&field_id)
    }

    pub fn str_value(&self, field_id: u32) -> Option<&str> {
        self.get(field_id).and_then(FieldValue::as_str)
    }

    pub fn text_value(&self, field_id: u32) -> Option<String> {
        self.get(field_id).and_then(FieldValue::as_text)
    }

    pub fn bool_value(&self, field_id: u32) -> Option<bool> {
        self.get(field_id).and_then(FieldValue::as_bool)
    }

    pub fn i64_value(&self, field_id: u32) -> Option<i64> {
        self.get(field_id).and_then(FieldValue::as_i64)
    }

    /// Record id stored under the given field
    pub fn record_id(&self, field_id: u32) -> Option<RecordId> {
        self.i64_value(field_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u32, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// The wire format keys fields by decimal strings ("3": {"value": ...}).
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field_id, value) in &self.fields {
            map.serialize_entry(&field_id.to_string(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of field ids to field values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((key, value)) = access.next_entry::<String, FieldValue>()? {
                    // Non-numeric keys are store-side decorations, not fields
                    if let Ok(field_id) = key.parse::<u32>() {
                        record.fields.insert(field_id, value);
                    }
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Body of `POST /records/query`
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub from: String,
    pub select: Vec<u32>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<QueryOptions>,
}

/// Paging options for a query
#[derive(Debug, Clone, Serialize)]
pub struct QueryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
}

/// Response of `POST /records/query`
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub metadata: Option<QueryMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
    #[serde(default)]
    pub total_records: Option<u32>,
    #[serde(default)]
    pub num_records: Option<u32>,
    #[serde(default)]
    pub skip: Option<u32>,
}

/// Body of `POST /records` (create, or upsert when rows carry their id)
#[derive(Debug, Clone, Serialize)]
pub struct WriteRequest {
    pub to: String,
    pub data: Vec<Record>,
    #[serde(rename = "fieldsToReturn", skip_serializing_if = "Option::is_none")]
    pub fields_to_return: Option<Vec<u32>>,
}

/// Response of `POST /records`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriteResponse {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub metadata: WriteMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteMetadata {
    #[serde(default)]
    pub created_record_ids: Vec<RecordId>,
    #[serde(default)]
    pub updated_record_ids: Vec<RecordId>,
    #[serde(default)]
    pub unchanged_record_ids: Vec<RecordId>,
}

/// Body of `DELETE /records`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteRequest {
    pub from: String,
    #[serde(rename = "where")]
    pub where_clause: String,
}

/// Response of `DELETE /records`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    #[serde(default)]
    pub number_deleted: u32,
}

/// Error body the store returns on non-success responses
#[derive(Debug, Clone, Deserialize)]
pub struct StoreErrorBody {
    pub message: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Payload for writing a file field: name plus base64 content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    pub file_name: String,
    pub data: String,
}

/// Stored file field value: a download URL plus the version history.
/// The current file is the latest version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub url: String,
    #[serde(default)]
    pub versions: Vec<FileVersion>,
}

impl FileAttachment {
    /// The most recent version, if any
    pub fn latest_version(&self) -> Option<&FileVersion> {
        self.versions.last()
    }
}

/// One entry in a file field's version history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    pub file_name: String,
    pub version_number: u32,
    #[serde(default)]
    pub uploaded: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creator: Option<FileActor>,
}

/// User attribution on a file version
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileActor {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user_name: String,
}

/// A downloaded file: recovered name plus base64 content
#[derive(Debug, Clone)]
pub struct FileDownload {
    pub file_name: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_round_trip() {
        let record = Record::new()
            .with(3, 17)
            .with(6, "leaking pipe")
            .with(7, true);
        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(
            encoded,
            json!({
                "3": {"value": 17},
                "6": {"value": "leaking pipe"},
                "7": {"value": true}
            })
        );

        let decoded: Record = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_record_ignores_non_numeric_keys() {
        let decoded: Record = serde_json::from_value(json!({
            "3": {"value": 9},
            "record_id": {"value": 9}
        }))
        .unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.record_id(3), Some(9));
    }

    #[test]
    fn test_typed_accessors() {
        let record = Record::new().with(3, "42").with(6, "text").with(7, false);
        assert_eq!(record.i64_value(3), Some(42));
        assert_eq!(record.str_value(6), Some("text"));
        assert_eq!(record.bool_value(7), Some(false));
        assert_eq!(record.text_value(3), Some("42".to_string()));
        assert!(record.get(99).is_none());
    }

    #[test]
    fn test_latest_version() {
        let file: FileAttachment = serde_json::from_value(json!({
            "url": "/files/tbl/5/7/2",
            "versions": [
                {"fileName": "old.png", "versionNumber": 1},
                {"fileName": "new.png", "versionNumber": 2}
            ]
        }))
        .unwrap();
        assert_eq!(file.latest_version().unwrap().file_name, "new.png");
    }

    #[test]
    fn test_query_request_shape() {
        let request = QueryRequest {
            from: "tbl1".into(),
            select: vec![3, 6],
            where_clause: Some("{10.EX.'f1'}".into()),
            options: None,
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            json!({"from": "tbl1", "select": [3, 6], "where": "{10.EX.'f1'}"})
        );
    }
}
