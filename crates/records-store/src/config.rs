//! Store configuration loaded from environment variables.
//!
//! Every setting has a default, so a store can be opened with zero
//! configuration.

use std::path::PathBuf;

use records_shared::constants::DEFAULT_ARCHIVE_ACTOR;

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backing file. `None` resolves to `database.json` in the platform data
    /// directory.
    /// Env: `RECORDS_DB_PATH`
    pub db_path: Option<PathBuf>,

    /// Reject inserts whose id is already present in the collection.
    /// Env: `RECORDS_ENFORCE_UNIQUE_IDS` (true/false)
    /// Default: `true`
    pub enforce_unique_ids: bool,

    /// Value written to `archivedBy` on new archive records.
    /// Env: `RECORDS_ARCHIVE_ACTOR`
    /// Default: `"ADMIN"`
    pub archive_actor: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            enforce_unique_ids: true,
            archive_actor: DEFAULT_ARCHIVE_ACTOR.to_string(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("RECORDS_DB_PATH") {
            if !path.is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(val) = lookup("RECORDS_ENFORCE_UNIQUE_IDS") {
            match parse_bool(&val) {
                Some(flag) => config.enforce_unique_ids = flag,
                None => tracing::warn!(
                    value = %val,
                    "Invalid RECORDS_ENFORCE_UNIQUE_IDS, using default"
                ),
            }
        }

        if let Some(actor) = lookup("RECORDS_ARCHIVE_ACTOR") {
            if !actor.trim().is_empty() {
                config.archive_actor = actor.trim().to_string();
            }
        }

        config
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
