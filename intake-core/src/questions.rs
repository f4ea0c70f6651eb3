//! Read-only access to the question set of a form.

use std::sync::Arc;

use intake_store::filter::Filter;
use intake_store::schema::{questions, Collection};
use intake_store::RecordStore;

use crate::error::CoreError;
use crate::models::Question;

const QUESTION_SELECT: [u32; 3] = [questions::RECORD_ID, questions::TEXT, questions::REQUIRED];

/// Fetches questions for a form
pub struct Questions {
    store: Arc<dyn RecordStore>,
}

impl Questions {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All questions belonging to a form
    pub async fn list(&self, form_id: &str) -> Result<Vec<Question>, CoreError> {
        let rows = self
            .store
            .query(
                Collection::Questions,
                &QUESTION_SELECT,
                &Filter::field_eq(questions::FORM_ID, form_id),
            )
            .await?;
        rows.iter().map(Question::from_record).collect()
    }

    /// A single question by id
    pub async fn get(&self, question_id: &str) -> Result<Question, CoreError> {
        let rows = self
            .store
            .query(
                Collection::Questions,
                &QUESTION_SELECT,
                &Filter::field_eq(questions::RECORD_ID, question_id),
            )
            .await?;
        let row = rows
            .first()
            .ok_or_else(|| CoreError::invariant(format!("question {} not found", question_id)))?;
        Question::from_record(row)
    }
}
