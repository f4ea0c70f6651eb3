//! # Intake Core
//!
//! Answer/attachment reconciliation for the work-request intake
//! platform, on top of the `intake-store` record store SDK.
//!
//! A work request scopes a set of question/answer interactions: the
//! question list is fetched per form, each question's answer is created
//! or updated in place (at most one answer per question and request,
//! enforced by query-before-write), files can be attached to an answer,
//! and progress is derived from the answer set.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use intake_core::models::Priority;
//! use intake_core::requests::WorkRequests;
//! use intake_core::session::IntakeSession;
//! use intake_store::{config::StoreConfig, quickbase::QuickbaseClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::load()?;
//!     let store = Arc::new(QuickbaseClient::new(config)?);
//!
//!     let request = WorkRequests::new(store.clone())
//!         .create("Fix leak", Priority::High)
//!         .await?;
//!
//!     let session = IntakeSession::for_request(store, &request);
//!     let board = session.question_board().await?;
//!     println!(
//!         "{} of {} questions answered",
//!         board.progress.completed, board.progress.total
//!     );
//!     Ok(())
//! }
//! ```

pub mod attachments;
pub mod error;
pub mod models;
pub mod progress;
pub mod questions;
pub mod reconciler;
pub mod requests;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use error::CoreError;
pub use progress::Progress;
