//! Document migration runner.
//!
//! Migrations are executed in order every time the backing file is read
//! ([`Database::open_at`](crate::Database::open_at), reloads). The file format
//! carries no version field, so each step inspects the document itself and
//! reports whether it changed anything; applying a step twice is a no-op.

pub mod v001_collections;
pub mod v002_document_request_id;

use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

type Step = fn(&mut Map<String, Value>) -> std::result::Result<bool, String>;

/// All steps, oldest first. Append new migrations at the end.
const MIGRATIONS: &[(&str, Step)] = &[
    ("v001_collections", v001_collections::up),
    ("v002_document_request_id", v002_document_request_id::up),
];

/// Run every migration against the top-level object of the document.
///
/// Returns `true` when at least one step modified the document.
pub fn run_migrations(document: &mut Map<String, Value>) -> Result<bool> {
    let mut changed = false;

    for (name, step) in MIGRATIONS {
        let applied =
            step(document).map_err(|e| StoreError::Migration(format!("{name}: {e}")))?;
        if applied {
            tracing::info!(migration = name, "applied migration");
            changed = true;
        }
    }

    Ok(changed)
}
