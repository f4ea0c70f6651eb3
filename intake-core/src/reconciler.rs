//! Create-or-update reconciliation for answers.
//!
//! The store has no uniqueness constraint on (question, request); the
//! at-most-one-answer invariant is enforced here by query-before-write.
//! Two concurrent writers can still race a duplicate into existence,
//! which is why multi-row results are tolerated below.

use std::sync::Arc;

use intake_store::filter::Filter;
use intake_store::records::{Record, RecordId};
use intake_store::schema::{answers, Collection};
use intake_store::RecordStore;

use crate::error::CoreError;
use crate::models::Answer;

const ANSWER_SELECT: [u32; 6] = [
    answers::RECORD_ID,
    answers::TEXT,
    answers::USER_ID,
    answers::USER_EMAIL,
    answers::QUESTION_ID,
    answers::REQUEST_ID,
];

/// Reconciles answers against the remote store
pub struct AnswerReconciler {
    store: Arc<dyn RecordStore>,
}

impl AnswerReconciler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    async fn matching_rows(
        &self,
        question_id: &str,
        request_id: &str,
    ) -> Result<Vec<Record>, CoreError> {
        let filter = Filter::field_eq(answers::QUESTION_ID, question_id)
            .and_eq(answers::REQUEST_ID, request_id);
        let rows = self
            .store
            .query(Collection::Answers, &ANSWER_SELECT, &filter)
            .await?;
        if rows.len() > 1 {
            let orphaned: Vec<RecordId> = rows[1..]
                .iter()
                .filter_map(|row| row.record_id(answers::RECORD_ID))
                .collect();
            tracing::warn!(
                question_id,
                request_id,
                ?orphaned,
                "multiple answer rows for one question/request pair; using the first"
            );
        }
        Ok(rows)
    }

    /// The existing answer for a (question, request) pair, if any.
    /// When duplicates exist the first row returned wins.
    pub async fn find(
        &self,
        question_id: &str,
        request_id: &str,
    ) -> Result<Option<Answer>, CoreError> {
        let rows = self.matching_rows(question_id, request_id).await?;
        rows.first().map(Answer::from_record).transpose()
    }

    /// Create or update the answer for a (question, request) pair and
    /// return its record id. After this returns, the id identifies "the"
    /// answer for the pair as far as this caller is concerned.
    pub async fn submit(
        &self,
        question_id: &str,
        request_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<RecordId, CoreError> {
        let rows = self.matching_rows(question_id, request_id).await?;

        match rows.first() {
            None => {
                let row = Record::new()
                    .with(answers::QUESTION_ID, question_id)
                    .with(answers::TEXT, text)
                    .with(answers::USER_ID, user_id)
                    .with(answers::REQUEST_ID, request_id);
                let ids = self.store.create(Collection::Answers, vec![row]).await?;
                // Without a created id there is nothing to attach files to
                ids.first().copied().ok_or_else(|| {
                    CoreError::invariant("answer create returned no record id")
                })
            }
            Some(existing) => {
                let id = existing
                    .record_id(answers::RECORD_ID)
                    .ok_or_else(|| CoreError::invariant("answer row has no record id"))?;
                let row = Record::new()
                    .with(answers::RECORD_ID, id)
                    .with(answers::TEXT, text)
                    .with(answers::USER_ID, user_id)
                    .with(answers::REQUEST_ID, request_id);
                self.store.update(Collection::Answers, vec![row]).await?;
                Ok(id)
            }
        }
    }

    /// All answers recorded for a work request
    pub async fn for_request(&self, request_id: &str) -> Result<Vec<Answer>, CoreError> {
        let rows = self
            .store
            .query(
                Collection::Answers,
                &ANSWER_SELECT,
                &Filter::field_eq(answers::REQUEST_ID, request_id),
            )
            .await?;
        rows.iter().map(Answer::from_record).collect()
    }
}
