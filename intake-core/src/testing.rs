//! In-memory record store used by the unit tests.
//!
//! Emulates the remote semantics the core depends on: store-assigned
//! record ids, filter-by-equality queries, upsert keyed by the record-id
//! field, delete-by-filter, file fields with append-only version
//! histories, and server-filled fields on work-request creation.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use intake_store::filter::Filter;
use intake_store::records::{FieldValue, FileDownload, Record, RecordId, WriteResponse};
use intake_store::schema::{answers, attachments, questions, work_requests, Collection};
use intake_store::{RecordStore, StoreError};
use serde_json::{json, Value};

// Every collection keys its rows under field 3
const RECORD_ID_FIELD: u32 = 3;

pub(crate) struct MemoryStore {
    tables: Mutex<HashMap<Collection, BTreeMap<RecordId, Record>>>,
    next_id: AtomicI64,
    swallow_ids: AtomicBool,
    fail_next_write: Mutex<Option<StoreError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            swallow_ids: AtomicBool::new(false),
            fail_next_write: Mutex::new(None),
        }
    }

    fn allocate_id(&self) -> RecordId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Make the next create respond without created ids
    pub fn swallow_created_ids(&self) {
        self.swallow_ids.store(true, Ordering::SeqCst);
    }

    /// Make the next create or update fail with the given error
    pub fn fail_next_write(&self, error: StoreError) {
        *self.fail_next_write.lock().unwrap() = Some(error);
    }

    pub fn row_count(&self, collection: Collection) -> usize {
        self.tables
            .lock()
            .unwrap()
            .get(&collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    pub fn seed_question(&self, form_id: &str, text: &str, required: bool) -> RecordId {
        let id = self.allocate_id();
        let record = Record::new()
            .with(questions::RECORD_ID, id)
            .with(questions::TEXT, text)
            .with(questions::REQUIRED, required)
            .with(questions::FORM_ID, form_id);
        self.insert(Collection::Questions, id, record);
        id
    }

    pub fn seed_answer(
        &self,
        question_id: &str,
        request_id: &str,
        user_id: &str,
        text: &str,
    ) -> RecordId {
        let id = self.allocate_id();
        let record = Record::new()
            .with(answers::RECORD_ID, id)
            .with(answers::TEXT, text)
            .with(answers::USER_ID, user_id)
            .with(answers::USER_EMAIL, format!("{}@example.com", user_id))
            .with(answers::QUESTION_ID, question_id)
            .with(answers::REQUEST_ID, request_id);
        self.insert(Collection::Answers, id, record);
        id
    }

    fn insert(&self, collection: Collection, id: RecordId, record: Record) {
        self.tables
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .insert(id, record);
    }

    fn take_write_failure(&self) -> Option<StoreError> {
        self.fail_next_write.lock().unwrap().take()
    }
}

fn matches_filter(record: &Record, filter: &Filter) -> bool {
    filter.clauses().iter().all(|(field_id, value)| {
        record
            .get(*field_id)
            .and_then(FieldValue::as_text)
            .map(|text| text == *value)
            .unwrap_or(false)
    })
}

fn project(record: &Record, select: &[u32]) -> Record {
    if select.is_empty() {
        return record.clone();
    }
    let mut projected = Record::new();
    for field_id in select {
        if let Some(cell) = record.get(*field_id) {
            projected.set(*field_id, cell.value.clone());
        }
    }
    projected
}

/// An incoming `{fileName, data}` payload becomes a stored blob with an
/// appended version, the way the remote store versions file fields.
fn is_upload_payload(value: &Value) -> bool {
    value.get("fileName").is_some() && value.get("data").is_some()
}

fn file_blob(incoming: &Value, record_id: RecordId, prior: Option<&Value>) -> Value {
    let file_name = incoming
        .get("fileName")
        .and_then(Value::as_str)
        .unwrap_or("file");
    let data = incoming.get("data").cloned().unwrap_or(Value::Null);
    let mut versions = prior
        .and_then(|value| value.get("versions"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let version_number = versions.len() as u64 + 1;
    versions.push(json!({
        "fileName": file_name,
        "versionNumber": version_number,
        "data": data
    }));
    json!({
        "url": format!("/files/attachments/{}/7/{}", record_id, version_number),
        "versions": versions
    })
}

fn absorb_row(stored: &mut Record, incoming: &Record, record_id: RecordId) {
    for (field_id, cell) in incoming.iter() {
        if is_upload_payload(&cell.value) {
            let prior = stored.get(*field_id).map(|prior| prior.value.clone());
            stored.set(*field_id, file_blob(&cell.value, record_id, prior.as_ref()));
        } else {
            stored.set(*field_id, cell.value.clone());
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn query(
        &self,
        collection: Collection,
        select: &[u32],
        filter: &Filter,
    ) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let rows = tables
            .get(&collection)
            .map(|table| {
                table
                    .values()
                    .filter(|record| matches_filter(record, filter))
                    .map(|record| project(record, select))
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn create_returning(
        &self,
        collection: Collection,
        rows: Vec<Record>,
        fields_to_return: &[u32],
    ) -> Result<WriteResponse, StoreError> {
        if let Some(error) = self.take_write_failure() {
            return Err(error);
        }

        let swallow = self.swallow_ids.swap(false, Ordering::SeqCst);
        let mut response = WriteResponse::default();
        for row in rows {
            let id = self.allocate_id();
            let mut stored = Record::new();
            stored.set(RECORD_ID_FIELD, id);
            absorb_row(&mut stored, &row, id);

            // Server-filled fields on work request creation
            if collection == Collection::WorkRequests {
                stored.set(
                    work_requests::REQUESTER,
                    json!({"email": "requester@example.com", "id": "u-1", "name": "Requester"}),
                );
                if stored.get(work_requests::FORM_ID).is_none() {
                    stored.set(work_requests::FORM_ID, "form-1");
                }
            }

            if !fields_to_return.is_empty() {
                response.data.push(project(&stored, fields_to_return));
            }
            if !swallow {
                response.metadata.created_record_ids.push(id);
            }
            self.insert(collection, id, stored);
        }
        Ok(response)
    }

    async fn update(&self, collection: Collection, rows: Vec<Record>) -> Result<(), StoreError> {
        if let Some(error) = self.take_write_failure() {
            return Err(error);
        }

        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(collection).or_default();
        for row in rows {
            let id = row
                .record_id(RECORD_ID_FIELD)
                .ok_or_else(|| StoreError::invalid("update row carries no record id"))?;
            let stored = table.entry(id).or_default();
            absorb_row(stored, &row, id);
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<u32, StoreError> {
        if filter.is_empty() {
            return Err(StoreError::invalid("delete requires a non-empty filter"));
        }
        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(collection).or_default();
        let doomed: Vec<RecordId> = table
            .iter()
            .filter(|(_, record)| matches_filter(record, filter))
            .map(|(id, _)| *id)
            .collect();
        for id in &doomed {
            table.remove(id);
        }
        Ok(doomed.len() as u32)
    }

    async fn download(
        &self,
        collection: Collection,
        path: &str,
    ) -> Result<FileDownload, StoreError> {
        let tables = self.tables.lock().unwrap();
        let table = tables.get(&collection);
        let blob = table
            .into_iter()
            .flat_map(|table| table.values())
            .filter_map(|record| record.get(file_field_of(collection)))
            .find(|cell| cell.value.get("url").and_then(Value::as_str) == Some(path))
            .ok_or_else(|| StoreError::upload(format!("no stored file at {}", path)))?;

        let latest = blob
            .value
            .get("versions")
            .and_then(Value::as_array)
            .and_then(|versions| versions.last())
            .ok_or_else(|| StoreError::upload("stored file has no versions"))?;
        Ok(FileDownload {
            file_name: latest
                .get("fileName")
                .and_then(Value::as_str)
                .unwrap_or("downloaded_file")
                .to_string(),
            content: latest
                .get("data")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

fn file_field_of(collection: Collection) -> u32 {
    match collection {
        Collection::Attachments => attachments::FILE,
        _ => u32::MAX,
    }
}
