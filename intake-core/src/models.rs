//! Domain models, parsed from wire records once at the client boundary.

use intake_store::records::{FileAttachment, Record, RecordId};
use intake_store::schema::{answers, attachments, questions, work_requests};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Priority of a work request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

/// The top-level case a user creates; its ids key every later read and
/// write. Immutable after creation from the client's perspective.
#[derive(Debug, Clone)]
pub struct WorkRequest {
    pub id: RecordId,
    pub requester_email: String,
    pub form_id: String,
    pub subject: String,
    pub priority: Priority,
}

/// A question on a form; read-only from the client
#[derive(Debug, Clone)]
pub struct Question {
    pub id: RecordId,
    pub text: String,
    pub required: bool,
}

impl Question {
    pub fn from_record(record: &Record) -> Result<Self, CoreError> {
        let id = record
            .record_id(questions::RECORD_ID)
            .ok_or_else(|| CoreError::invariant("question row has no record id"))?;
        Ok(Self {
            id,
            text: record.text_value(questions::TEXT).unwrap_or_default(),
            required: record.bool_value(questions::REQUIRED).unwrap_or(false),
        })
    }
}

/// One user's answer to one question within one work request
#[derive(Debug, Clone)]
pub struct Answer {
    pub id: RecordId,
    pub question_id: String,
    pub request_id: String,
    pub user_id: String,
    pub user_email: String,
    pub text: String,
}

impl Answer {
    pub fn from_record(record: &Record) -> Result<Self, CoreError> {
        let id = record
            .record_id(answers::RECORD_ID)
            .ok_or_else(|| CoreError::invariant("answer row has no record id"))?;
        Ok(Self {
            id,
            question_id: record.text_value(answers::QUESTION_ID).unwrap_or_default(),
            request_id: record.text_value(answers::REQUEST_ID).unwrap_or_default(),
            user_id: record.text_value(answers::USER_ID).unwrap_or_default(),
            user_email: record.text_value(answers::USER_EMAIL).unwrap_or_default(),
            text: record.text_value(answers::TEXT).unwrap_or_default(),
        })
    }
}

/// Kind of an attachment, inferred from the file-name suffix alone
/// (case-insensitive). This is a deliberate heuristic; the transport
/// content type is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Pdf,
    Document,
}

impl AttachmentKind {
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = file_name
            .rsplit('.')
            .next()
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("jpg") | Some("jpeg") | Some("png") | Some("gif") => AttachmentKind::Image,
            Some("pdf") => AttachmentKind::Pdf,
            _ => AttachmentKind::Document,
        }
    }
}

/// A file attached to an answer. The store keeps a version history per
/// attachment; the current file is the latest version.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub id: RecordId,
    pub file: Option<FileAttachment>,
    pub direct_url: Option<String>,
}

impl Attachment {
    pub fn from_record(record: &Record) -> Result<Self, CoreError> {
        let id = record
            .record_id(attachments::RECORD_ID)
            .ok_or_else(|| CoreError::invariant("attachment row has no record id"))?;
        let file = match record.get(attachments::FILE) {
            Some(cell) if cell.value.is_object() => {
                Some(serde_json::from_value(cell.value.clone()).map_err(|e| {
                    CoreError::invariant(format!("attachment {} has a malformed file field: {}", id, e))
                })?)
            }
            _ => None,
        };
        Ok(Self {
            id,
            file,
            direct_url: record
                .str_value(attachments::DIRECT_URL)
                .map(|url| url.to_string()),
        })
    }

    /// File name of the latest version
    pub fn file_name(&self) -> Option<&str> {
        self.file
            .as_ref()
            .and_then(FileAttachment::latest_version)
            .map(|version| version.file_name.as_str())
    }

    pub fn kind(&self) -> AttachmentKind {
        self.file_name()
            .map(AttachmentKind::from_file_name)
            .unwrap_or(AttachmentKind::Document)
    }
}

impl WorkRequest {
    /// Build from the create projection: id, form id and requester email
    /// come back on the returned row.
    pub(crate) fn from_created_record(
        record: &Record,
        subject: &str,
        priority: Priority,
    ) -> Result<Self, CoreError> {
        let id = record
            .record_id(work_requests::RECORD_ID)
            .ok_or_else(|| CoreError::invariant("work request create returned no record id"))?;
        let form_id = record
            .text_value(work_requests::FORM_ID)
            .ok_or_else(|| CoreError::invariant("work request create returned no form id"))?;
        let requester_email = record
            .get(work_requests::REQUESTER)
            .and_then(|cell| cell.as_object())
            .and_then(|user| user.get("email"))
            .and_then(|email| email.as_str())
            .ok_or_else(|| CoreError::invariant("work request create returned no requester"))?
            .to_string();
        Ok(Self {
            id,
            requester_email,
            form_id,
            subject: subject.to_string(),
            priority,
        })
    }
}
