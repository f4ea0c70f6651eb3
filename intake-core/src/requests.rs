//! Work-request creation.

use std::sync::Arc;

use intake_store::records::Record;
use intake_store::schema::{work_requests, Collection};
use intake_store::RecordStore;

use crate::error::CoreError;
use crate::models::{Priority, WorkRequest};

/// Creates work requests in the remote store
pub struct WorkRequests {
    store: Arc<dyn RecordStore>,
}

impl WorkRequests {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a work request and read back the ids that key the rest of
    /// the session: record id, form id and the requester's email.
    pub async fn create(&self, subject: &str, priority: Priority) -> Result<WorkRequest, CoreError> {
        let row = Record::new()
            .with(work_requests::SUBJECT, subject)
            .with(work_requests::PRIORITY, priority.to_string());

        let response = self
            .store
            .create_returning(
                Collection::WorkRequests,
                vec![row],
                &[
                    work_requests::RECORD_ID,
                    work_requests::FORM_ID,
                    work_requests::REQUESTER,
                ],
            )
            .await?;

        let record = response
            .data
            .first()
            .ok_or_else(|| CoreError::invariant("work request create returned no record"))?;
        let request = WorkRequest::from_created_record(record, subject, priority)?;
        tracing::debug!(
            request_id = request.id,
            form_id = %request.form_id,
            "created work request"
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[tokio::test]
    async fn test_create_reads_back_ids() {
        let store = Arc::new(MemoryStore::new());
        let requests = WorkRequests::new(store);

        let request = requests.create("Fix leak", Priority::High).await.unwrap();
        assert!(request.id > 0);
        assert!(!request.form_id.is_empty());
        assert_eq!(request.requester_email, "requester@example.com");
        assert_eq!(request.subject, "Fix leak");
        assert_eq!(request.priority, Priority::High);
    }
}
