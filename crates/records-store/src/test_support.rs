//! Fixtures shared by the unit tests.

use std::path::Path;

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::config::StoreConfig;
use crate::database::Database;
use crate::models::{Citizen, Document, ServiceRequest};

/// A fresh store in its own temporary directory. Keep the `TempDir` alive
/// for as long as the database is used.
pub fn open_temp() -> (TempDir, Database) {
    open_temp_with(StoreConfig::default())
}

pub fn open_temp_with(config: StoreConfig) -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("database.json");
    let db = Database::open_at(&path, config).expect("open temp database");
    (dir, db)
}

pub fn citizen(id: &str) -> Citizen {
    Citizen::new(
        id,
        format!("Citizen {id}"),
        format!("{}@example.ph", id.to_lowercase()),
        "09171234567",
        "secret",
    )
}

pub fn request(id: &str, citizen_id: &str) -> ServiceRequest {
    ServiceRequest::new(id, citizen_id, "Business Permit", "new application")
}

/// A pending document with a fixed upload time, so two calls compare equal.
pub fn document(id: &str, request_id: &str, citizen_id: &str) -> Document {
    let mut document = Document::new(id, request_id, format!("/uploads/{id}.pdf"), citizen_id);
    document.upload_time = NaiveDate::from_ymd_opt(2025, 11, 26)
        .and_then(|d| d.and_hms_opt(9, 15, 0))
        .expect("valid timestamp");
    document
}

/// The backing file parsed as plain JSON.
pub fn read_file(path: &Path) -> serde_json::Value {
    let bytes = std::fs::read(path).expect("read database file");
    serde_json::from_slice(&bytes).expect("database file is JSON")
}
