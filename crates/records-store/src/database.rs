//! Backing-file management.
//!
//! The [`Database`] struct owns the whole JSON document in memory and the
//! path it was loaded from. Every mutating call re-reads the file first (so
//! a write made through another instance is never overwritten with stale
//! data), applies its change in memory, and then rewrites the whole file
//! atomically.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use records_shared::constants::{DATABASE_FILE_NAME, JSON_INDENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::migrations;

/// In-memory form of the persisted document.
///
/// Records stay raw JSON objects so that fields this version does not know
/// about, and records that fail to decode, survive a rewrite untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct Root {
    #[serde(default)]
    pub citizens: Vec<Value>,
    #[serde(default)]
    pub documents: Vec<Value>,
    #[serde(default)]
    pub requests: Vec<Value>,
    #[serde(default)]
    pub archives: Vec<Value>,
}

/// How the document came to be in memory when the database was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No backing file existed; an empty document was written.
    Created,
    /// The backing file was read. `migrated` is true when a migration step
    /// changed it.
    Opened { migrated: bool },
    /// The backing file was unreadable. It was moved to `backup` and an
    /// empty document was written in its place.
    Recovered { backup: PathBuf },
}

/// Handle on the JSON document store.
pub struct Database {
    path: PathBuf,
    config: StoreConfig,
    pub(crate) root: Root,
    /// Fingerprint of the bytes last read from or written to `path`.
    fingerprint: Option<blake3::Hash>,
    revision: u64,
    outcome: LoadOutcome,
}

impl Database {
    /// Open (or create) the database described by `config`.
    ///
    /// Without an explicit `db_path` the file is placed in the
    /// platform-appropriate data directory:
    /// - Linux:   `~/.local/share/records-office/database.json`
    /// - macOS:   `~/Library/Application Support/ph.records-office.records-office/database.json`
    /// - Windows: `{FOLDERID_RoamingAppData}\records-office\records-office\data\database.json`
    pub fn new(config: StoreConfig) -> Result<Self> {
        let path = match &config.db_path {
            Some(path) => path.clone(),
            None => {
                let project_dirs = ProjectDirs::from("ph", "records-office", "records-office")
                    .ok_or(StoreError::NoDataDir)?;
                let data_dir = project_dirs.data_dir();
                fs::create_dir_all(data_dir)?;
                data_dir.join(DATABASE_FILE_NAME)
            }
        };

        Self::open_at(&path, config)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// A missing file is initialized empty. An existing file is migrated and
    /// written back immediately. A file that does not parse is moved aside
    /// and replaced with an empty document; see [`LoadOutcome::Recovered`].
    pub fn open_at(path: &Path, config: StoreConfig) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening database");

        let mut db = Self {
            path: path.to_path_buf(),
            config,
            root: Root::default(),
            fingerprint: None,
            revision: 0,
            outcome: LoadOutcome::Created,
        };

        match fs::read(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("no database file, initializing empty document");
            }
            Err(e) => return Err(e.into()),
            Ok(bytes) => match parse_root(&bytes) {
                Ok((root, migrated)) => {
                    db.root = root;
                    db.outcome = LoadOutcome::Opened { migrated };
                }
                Err(StoreError::Parse(err)) => {
                    let backup = quarantine(path)?;
                    tracing::warn!(
                        error = %err,
                        backup = %backup.display(),
                        "database file is unreadable, starting from an empty document"
                    );
                    db.outcome = LoadOutcome::Recovered { backup };
                }
                Err(other) => return Err(other),
            },
        }

        db.flush()?;

        tracing::debug!(
            citizens = db.root.citizens.len(),
            documents = db.root.documents.len(),
            requests = db.root.requests.len(),
            archives = db.root.archives.len(),
            "database loaded"
        );

        Ok(db)
    }

    /// Filesystem path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    /// Number of in-memory mutations applied since the database was opened.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Write the whole document to the backing file.
    ///
    /// The bytes go to a temporary file in the same directory which is then
    /// renamed over the target, so a crash mid-write leaves the previous
    /// version intact. On failure the in-memory document keeps whatever
    /// mutation preceded the call.
    pub fn flush(&mut self) -> Result<()> {
        let bytes = encode_root(&self.root)?;
        write_atomic(&self.path, &bytes).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "failed to save database");
            e
        })?;
        self.fingerprint = Some(blake3::hash(&bytes));

        tracing::debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            revision = self.revision,
            "database saved"
        );
        Ok(())
    }

    /// Discard the in-memory document and read the backing file again.
    pub fn reload(&mut self) -> Result<()> {
        let bytes = fs::read(&self.path)?;
        let (root, migrated) = parse_root(&bytes)?;
        self.root = root;
        self.fingerprint = Some(blake3::hash(&bytes));
        tracing::info!(migrated, "database reloaded from disk");
        Ok(())
    }

    /// Bring the in-memory document up to date before a mutation.
    ///
    /// Reloads when the file's contents differ from what this instance last
    /// read or wrote. A missing file is left for the next flush to recreate.
    pub(crate) fn sync_from_disk(&mut self) -> Result<()> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.path.display(),
                    "database file disappeared, it will be recreated on save"
                );
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let hash = blake3::hash(&bytes);
        if self.fingerprint == Some(hash) {
            return Ok(());
        }

        tracing::info!(
            path = %self.path.display(),
            "database file changed outside this instance, reloading before write"
        );
        let (root, _) = parse_root(&bytes)?;
        self.root = root;
        self.fingerprint = Some(hash);
        Ok(())
    }

    /// Record a completed in-memory mutation and persist it.
    pub(crate) fn commit(&mut self) -> Result<()> {
        self.revision += 1;
        self.flush()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse raw file bytes, run migrations, and decode the four collections.
///
/// Returns whether any migration step changed the document.
pub(crate) fn parse_root(bytes: &[u8]) -> Result<(Root, bool)> {
    let mut value: Value = serde_json::from_slice(bytes)?;

    let object = value.as_object_mut().ok_or_else(|| {
        StoreError::Parse(serde::de::Error::custom(
            "top-level value is not a JSON object",
        ))
    })?;
    let migrated = migrations::run_migrations(object)?;

    let root: Root = serde_json::from_value(value)?;
    Ok((root, migrated))
}

/// Pretty-print the document with four-space indentation.
fn encode_root(root: &Root) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    root.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Atomic write: temp file + fsync + rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// Move an unreadable database file out of the way, keeping its contents.
fn quarantine(path: &Path) -> Result<PathBuf> {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DATABASE_FILE_NAME.into());
    name.push(format!(".corrupt-{}", chrono::Utc::now().timestamp_millis()));

    let backup = path.with_file_name(name);
    fs::rename(path, &backup)?;
    Ok(backup)
}
