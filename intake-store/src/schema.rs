//! Field-identifier contract for the remote schema.
//!
//! The store addresses columns by small integer field ids, distinct per
//! collection. The mapping below is versioned against the deployed realm
//! schema; business logic refers to these names, never to bare integers.

/// Logical collections in the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    WorkRequests,
    Questions,
    Answers,
    Attachments,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::WorkRequests => "work_requests",
            Collection::Questions => "questions",
            Collection::Answers => "answers",
            Collection::Attachments => "attachments",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Field ids for the questions collection
pub mod questions {
    pub const RECORD_ID: u32 = 3;
    pub const TEXT: u32 = 6;
    pub const REQUIRED: u32 = 7;
    pub const FORM_ID: u32 = 10;
}

/// Field ids for the answers collection
pub mod answers {
    pub const RECORD_ID: u32 = 3;
    pub const TEXT: u32 = 6;
    pub const USER_ID: u32 = 7;
    pub const USER_EMAIL: u32 = 8;
    pub const QUESTION_ID: u32 = 10;
    pub const REQUEST_ID: u32 = 12;
}

/// Field ids for the attachments collection
pub mod attachments {
    pub const RECORD_ID: u32 = 3;
    pub const ANSWER_ID: u32 = 6;
    pub const FILE: u32 = 7;
    pub const DIRECT_URL: u32 = 8;
}

/// Field ids for the work requests collection
pub mod work_requests {
    pub const RECORD_ID: u32 = 3;
    /// User object; carries the requester's email
    pub const REQUESTER: u32 = 4;
    pub const SUBJECT: u32 = 6;
    pub const FORM_ID: u32 = 32;
    pub const PRIORITY: u32 = 36;
}
