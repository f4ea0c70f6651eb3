//! # Intake Store SDK
//!
//! Typed async client for the hosted record store backing the intake
//! platform. Records live in remote tables addressed by integer field
//! ids; every operation is authorized by a short-lived temporary token
//! fetched just-in-time.
//!
//! ## Example
//!
//! ```rust,no_run
//! use intake_store::{
//!     config::StoreConfig,
//!     filter::Filter,
//!     quickbase::QuickbaseClient,
//!     schema::{questions, Collection},
//!     RecordStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::new("yourrealm.quickbase.com", "your-app-token");
//!     let client = QuickbaseClient::new(config)?;
//!
//!     let rows = client
//!         .query(
//!             Collection::Questions,
//!             &[questions::RECORD_ID, questions::TEXT, questions::REQUIRED],
//!             &Filter::field_eq(questions::FORM_ID, "form-12"),
//!         )
//!         .await?;
//!
//!     for row in rows {
//!         println!("{:?}", row.str_value(questions::TEXT));
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod quickbase;
pub mod records;
pub mod schema;

pub use client::RecordStore;
pub use error::{Operation, StoreError};
