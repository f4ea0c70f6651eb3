//! Attachment synchronization for an answer.
//!
//! The remote store keeps a version history per attachment id; a
//! "replace" appends a version rather than swapping the row, so the
//! local list is only trusted again after a refresh.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use intake_store::error::Operation;
use intake_store::filter::Filter;
use intake_store::records::{FileDownload, FileUpload, Record, RecordId};
use intake_store::schema::{attachments, Collection};
use intake_store::{RecordStore, StoreError};

use crate::error::CoreError;
use crate::models::Attachment;

const ATTACHMENT_SELECT: [u32; 3] = [
    attachments::RECORD_ID,
    attachments::FILE,
    attachments::DIRECT_URL,
];

/// Remote operations on the attachments collection
pub struct AttachmentSync {
    store: Arc<dyn RecordStore>,
}

impl AttachmentSync {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Read-through list of the attachments bound to an answer
    pub async fn list_for_answer(&self, answer_id: RecordId) -> Result<Vec<Attachment>, CoreError> {
        let rows = self
            .store
            .query(
                Collection::Attachments,
                &ATTACHMENT_SELECT,
                &Filter::field_eq(attachments::ANSWER_ID, answer_id.to_string()),
            )
            .await?;
        rows.iter().map(Attachment::from_record).collect()
    }

    /// Upload a file for an answer. With `existing_id` the write targets
    /// that attachment record and the store appends a new version;
    /// otherwise a new attachment row is created. The caller must
    /// re-fetch the list afterwards rather than assume it is current.
    pub async fn add_or_replace(
        &self,
        answer_id: RecordId,
        file_name: &str,
        content: &[u8],
        existing_id: Option<RecordId>,
    ) -> Result<(), CoreError> {
        let upload = FileUpload {
            file_name: file_name.to_string(),
            data: BASE64.encode(content),
        };
        let file_value = serde_json::to_value(&upload)
            .map_err(|e| CoreError::upload(format!("could not encode file payload: {}", e)))?;

        let mut row = Record::new();
        if let Some(id) = existing_id {
            row.set(attachments::RECORD_ID, id);
        }
        row.set(attachments::FILE, file_value);
        row.set(attachments::ANSWER_ID, answer_id);

        tracing::debug!(answer_id, file_name, replacing = ?existing_id, "uploading attachment");

        let written = match existing_id {
            Some(_) => self.store.update(Collection::Attachments, vec![row]).await,
            None => self
                .store
                .create(Collection::Attachments, vec![row])
                .await
                .map(|_| ()),
        };
        written.map_err(|e| CoreError::upload(e.to_string()))
    }

    /// Delete an attachment by id (an exact-id filter on the wire)
    pub async fn remove(&self, attachment_id: RecordId) -> Result<(), CoreError> {
        let deleted = self
            .store
            .delete(
                Collection::Attachments,
                &Filter::field_eq(attachments::RECORD_ID, attachment_id.to_string()),
            )
            .await?;
        if deleted == 0 {
            return Err(CoreError::Store(StoreError::remote(
                Collection::Attachments.name(),
                Operation::Delete,
                404,
                format!("no attachment matched id {}", attachment_id),
            )));
        }
        Ok(())
    }

    /// Fetch the current file content behind an attachment
    pub async fn download(&self, attachment: &Attachment) -> Result<FileDownload, CoreError> {
        let path = attachment
            .file
            .as_ref()
            .map(|file| file.url.as_str())
            .ok_or_else(|| {
                CoreError::upload(format!("attachment {} has no stored file", attachment.id))
            })?;
        Ok(self.store.download(Collection::Attachments, path).await?)
    }
}

/// The attachment list for one answer, kept consistent with the remote
/// store across mutations. A failed mutation leaves the list untouched.
pub struct AttachmentSet {
    answer_id: RecordId,
    items: Vec<Attachment>,
}

impl AttachmentSet {
    pub fn new(answer_id: RecordId) -> Self {
        Self {
            answer_id,
            items: Vec::new(),
        }
    }

    /// Load the set for an answer
    pub async fn fetch(sync: &AttachmentSync, answer_id: RecordId) -> Result<Self, CoreError> {
        let mut set = Self::new(answer_id);
        set.refresh(sync).await?;
        Ok(set)
    }

    pub fn answer_id(&self) -> RecordId {
        self.answer_id
    }

    pub fn items(&self) -> &[Attachment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the local list with the store's current state
    pub async fn refresh(&mut self, sync: &AttachmentSync) -> Result<(), CoreError> {
        self.items = sync.list_for_answer(self.answer_id).await?;
        Ok(())
    }

    /// Upload a file, then re-fetch. On failure the local list is left
    /// as it was and the same call may be retried.
    pub async fn add_or_replace(
        &mut self,
        sync: &AttachmentSync,
        file_name: &str,
        content: &[u8],
        existing_id: Option<RecordId>,
    ) -> Result<(), CoreError> {
        sync.add_or_replace(self.answer_id, file_name, content, existing_id)
            .await?;
        self.refresh(sync).await
    }

    /// Delete an attachment. The id leaves the local list only once the
    /// store confirms the delete.
    pub async fn remove(
        &mut self,
        sync: &AttachmentSync,
        attachment_id: RecordId,
    ) -> Result<(), CoreError> {
        sync.remove(attachment_id).await?;
        self.items.retain(|attachment| attachment.id != attachment_id);
        Ok(())
    }
}
