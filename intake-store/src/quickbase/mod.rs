//! HTTP implementation of the record store against a Quickbase realm.

pub mod auth;
pub mod client;

pub use client::QuickbaseClient;
