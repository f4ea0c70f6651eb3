//! Per-request orchestration of the question/answer workflows.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use intake_store::records::RecordId;
use intake_store::RecordStore;

use crate::attachments::AttachmentSync;
use crate::error::CoreError;
use crate::models::{Answer, Attachment, Question, WorkRequest};
use crate::progress::Progress;
use crate::questions::Questions;
use crate::reconciler::AnswerReconciler;

/// A file handed to `submit_answer`
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// One question with its current answer state
#[derive(Debug, Clone)]
pub struct QuestionEntry {
    pub question: Question,
    pub answer: Option<Answer>,
    pub attachments: Vec<Attachment>,
}

/// The full question list for a request, with derived progress
#[derive(Debug, Clone)]
pub struct QuestionBoard {
    pub entries: Vec<QuestionEntry>,
    pub progress: Progress,
}

/// One user's session against one work request.
///
/// Remote state is the source of truth; this struct holds only the ids
/// that key the reads and writes.
pub struct IntakeSession {
    questions: Questions,
    answers: AnswerReconciler,
    attachments: AttachmentSync,
    pub user_id: String,
    pub request_id: String,
    pub form_id: String,
}

impl IntakeSession {
    pub fn new(
        store: Arc<dyn RecordStore>,
        user_id: impl Into<String>,
        request_id: impl Into<String>,
        form_id: impl Into<String>,
    ) -> Self {
        Self {
            questions: Questions::new(store.clone()),
            answers: AnswerReconciler::new(store.clone()),
            attachments: AttachmentSync::new(store),
            user_id: user_id.into(),
            request_id: request_id.into(),
            form_id: form_id.into(),
        }
    }

    /// Session for a freshly created work request
    pub fn for_request(store: Arc<dyn RecordStore>, request: &WorkRequest) -> Self {
        Self::new(
            store,
            request.requester_email.clone(),
            request.id.to_string(),
            request.form_id.clone(),
        )
    }

    /// Fetch every question with its answer and attachments. The
    /// per-question reads are independent by (question, request) key and
    /// are issued concurrently.
    pub async fn question_board(&self) -> Result<QuestionBoard, CoreError> {
        let questions = self.questions.list(&self.form_id).await?;

        let lookups = questions.iter().map(|question| {
            let question_id = question.id.to_string();
            async move {
                let answer = self.answers.find(&question_id, &self.request_id).await?;
                let attachments = match &answer {
                    Some(answer) => self.attachments.list_for_answer(answer.id).await?,
                    None => Vec::new(),
                };
                Ok::<_, CoreError>((answer, attachments))
            }
        });
        let results = join_all(lookups).await;

        let mut entries = Vec::with_capacity(questions.len());
        for (question, result) in questions.into_iter().zip(results) {
            let (answer, attachments) = result?;
            entries.push(QuestionEntry {
                question,
                answer,
                attachments,
            });
        }

        let completed = entries.iter().filter(|entry| entry.answer.is_some()).count();
        let progress = Progress::compute(completed, entries.len());
        Ok(QuestionBoard { entries, progress })
    }

    /// Submit an answer and optionally attach a file. The answer write
    /// comes first because the upload needs its record id; any failure
    /// aborts the remaining steps.
    pub async fn submit_answer(
        &self,
        question_id: &str,
        text: &str,
        upload: Option<Upload>,
    ) -> Result<RecordId, CoreError> {
        let answer_id = self
            .answers
            .submit(question_id, &self.request_id, &self.user_id, text)
            .await?;

        if let Some(upload) = upload {
            self.attachments
                .add_or_replace(answer_id, &upload.file_name, &upload.content, None)
                .await?;
        }

        Ok(answer_id)
    }

    /// Completion summary for this request: answered questions over the
    /// form's question count
    pub async fn progress(&self) -> Result<Progress, CoreError> {
        let questions = self.questions.list(&self.form_id).await?;
        let answers = self.answers.for_request(&self.request_id).await?;

        let question_ids: HashSet<String> =
            questions.iter().map(|q| q.id.to_string()).collect();
        let answered: HashSet<&str> = answers
            .iter()
            .map(|answer| answer.question_id.as_str())
            .filter(|question_id| question_ids.contains(*question_id))
            .collect();

        Ok(Progress::compute(answered.len(), questions.len()))
    }

    pub fn questions(&self) -> &Questions {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerReconciler {
        &self.answers
    }

    pub fn attachments(&self) -> &AttachmentSync {
        &self.attachments
    }
}
