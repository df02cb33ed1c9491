use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file (or a record in it) is not valid JSON of the
    /// expected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No record matched the requested key.
    #[error("Record not found")]
    NotFound,

    /// An insert would create a second record with the same key.
    #[error("Duplicate id in {collection}: {id}")]
    DuplicateId {
        collection: &'static str,
        id: String,
    },

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// An archive's `details` could not be decoded back into its entity.
    #[error("Archive {archive_id} holds an unreadable snapshot: {source}")]
    Snapshot {
        archive_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The entity is not in a state that can be archived under any
    /// archive category.
    #[error("Cannot archive {id}: {reason}")]
    NotArchivable { id: String, reason: String },

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,
}

impl From<tempfile::PersistError> for StoreError {
    fn from(err: tempfile::PersistError) -> Self {
        StoreError::Io(err.error)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
