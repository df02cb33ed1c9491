//! # records-store
//!
//! File-backed storage for the records office: citizens, service requests,
//! submitted documents, and the archive of deleted or finalized entities,
//! all kept in one JSON document on disk.
//!
//! The crate exposes a synchronous [`Database`] handle that loads the whole
//! document, repairs its shape on load, and rewrites it atomically after
//! every change. Typed CRUD helpers for every domain model live in the
//! per-entity modules; [`archival`] holds the archive and restore workflows.

pub mod archival;
pub mod archives;
pub mod citizens;
pub mod config;
pub mod database;
pub mod documents;
pub mod migrations;
pub mod models;
pub mod requests;

mod collection;
mod error;

#[cfg(test)]
mod test_support;

pub use config::StoreConfig;
pub use database::{Database, LoadOutcome};
pub use error::{Result, StoreError};
pub use models::*;
