//! Archive workflows built on the store.
//!
//! A citizen is soft-deleted by moving a snapshot into `archives` and
//! removing the live record; restoring decodes the snapshot and inserts it
//! again while the archive record stays as history. Finalized requests and
//! rejected documents are archived as snapshots only, the live records stay
//! where they are.

use records_shared::ids;
use serde_json::Value;

use crate::collection::{key_of, Record};
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{
    Archive, ArchiveType, Citizen, Document, DocumentStatus, RequestStatus, ServiceRequest,
};

impl Database {
    /// Archive a citizen and delete the live record.
    ///
    /// The snapshot is the stored JSON object as it is, so records missing
    /// fields the current model requires are archived too.
    ///
    /// Both changes are applied in memory and written with a single flush,
    /// so the file never holds the citizen in both collections. Fails with
    /// [`StoreError::NotFound`] (nothing written) when the citizen is not
    /// active.
    pub fn archive_citizen(&mut self, citizen_id: &str, reason: &str) -> Result<Archive> {
        self.sync_from_disk()?;

        let snapshot = self.find_raw::<Citizen>(citizen_id)?;
        let archive =
            self.snapshot_archive(citizen_id, ArchiveType::DeletedCitizen, &snapshot, reason)?;

        self.push(&archive)?;
        self.raw_mut::<Citizen>()
            .retain(|raw| key_of(raw, Citizen::KEY) != Some(citizen_id));
        self.commit()?;

        tracing::info!(
            citizen_id,
            archive_id = %archive.archive_id,
            reason,
            "citizen archived and deleted"
        );
        Ok(archive)
    }

    /// Re-insert a citizen from its most recent `DELETED_CITIZEN` archive.
    ///
    /// The archive record is left in place. With unique ids enforced,
    /// restoring a citizen that is already active fails with
    /// [`StoreError::DuplicateId`].
    pub fn restore_citizen(&mut self, citizen_id: &str) -> Result<Citizen> {
        self.sync_from_disk()?;

        let archive = self.latest_archive_for(citizen_id, ArchiveType::DeletedCitizen)?;
        let citizen = archive.citizen_snapshot()?;
        self.add_citizen(&citizen)?;

        tracing::info!(
            citizen_id,
            archive_id = %archive.archive_id,
            "citizen restored from archive"
        );
        Ok(citizen)
    }

    /// Archive a snapshot of a completed or rejected request.
    pub fn archive_request(&mut self, request_id: &str, reason: &str) -> Result<Archive> {
        self.sync_from_disk()?;

        let (request, snapshot) = self.find_with_raw::<ServiceRequest>(request_id)?;
        let archive_type = match request.status {
            RequestStatus::Completed => ArchiveType::CompletedRequest,
            RequestStatus::Rejected => ArchiveType::RejectedRequest,
            status => {
                return Err(StoreError::NotArchivable {
                    id: request_id.to_string(),
                    reason: format!("request is still {status}"),
                })
            }
        };

        let archive = self.snapshot_archive(request_id, archive_type, &snapshot, reason)?;
        self.add_to_archive(&archive)?;
        Ok(archive)
    }

    /// Archive a snapshot of a rejected document.
    pub fn archive_document(&mut self, document_id: &str, reason: &str) -> Result<Archive> {
        self.sync_from_disk()?;

        let (document, snapshot) = self.find_with_raw::<Document>(document_id)?;
        if document.status != DocumentStatus::Rejected {
            return Err(StoreError::NotArchivable {
                id: document_id.to_string(),
                reason: format!("document is {}", document.status),
            });
        }

        let archive =
            self.snapshot_archive(document_id, ArchiveType::RejectedDocument, &snapshot, reason)?;
        self.add_to_archive(&archive)?;
        Ok(archive)
    }

    fn snapshot_archive(
        &self,
        entity_id: &str,
        archive_type: ArchiveType,
        snapshot: &Value,
        reason: &str,
    ) -> Result<Archive> {
        let archive_id = ids::archive_id(entity_id, chrono::Utc::now().timestamp_millis());
        Ok(Archive::new(
            archive_id,
            entity_id,
            archive_type,
            serde_json::to_string(snapshot)?,
            self.config().archive_actor.clone(),
            reason,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::StoreConfig;
    use crate::database::Database;
    use crate::error::StoreError;
    use crate::models::{ArchiveType, Citizen, DocumentStatus, RequestStatus, ServiceRequest};
    use crate::test_support::{citizen, document, open_temp, open_temp_with, read_file, request};

    #[test]
    fn archive_citizen_moves_record_into_archives() {
        let (_dir, mut db) = open_temp();
        let original = Citizen::new("CT-1", "A", "a@x.com", "09171234567", "pw");
        db.add_citizen(&original).unwrap();
        db.add_citizen(&citizen("CT-2")).unwrap();

        let archive = db.archive_citizen("CT-1", "test").unwrap();

        assert!(db.list_citizens().iter().all(|c| c.id != "CT-1"));
        assert_eq!(db.list_citizens().len(), 1);

        let archives = db.list_archives();
        assert_eq!(archives.len(), 1);
        assert_eq!(archives[0], archive);
        assert_eq!(archive.entity_id, "CT-1");
        assert_eq!(archive.archive_type, ArchiveType::DeletedCitizen);
        assert_eq!(archive.reason, "test");
        assert_eq!(archive.archived_by, "ADMIN");
        assert!(archive.archive_id.starts_with("ARCH-CT-1-"));
        assert_eq!(archive.citizen_snapshot().unwrap(), original);

        let on_disk = read_file(db.path());
        assert_eq!(on_disk["citizens"].as_array().unwrap().len(), 1);
        assert_eq!(on_disk["archives"][0]["type"], "DELETED_CITIZEN");
        assert!(on_disk["archives"][0]["details"].is_string());
    }

    #[test]
    fn archive_citizen_keeps_incomplete_record_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(
            &path,
            r#"{"citizens": [{"id": "CT-1", "name": "A", "email": "a@x.com", "password": "pw"}]}"#,
        )
        .unwrap();
        let mut db = Database::open_at(&path, StoreConfig::default()).unwrap();

        let archive = db.archive_citizen("CT-1", "x").unwrap();

        let details: serde_json::Value = serde_json::from_str(&archive.details).unwrap();
        assert_eq!(
            details,
            serde_json::json!({"id": "CT-1", "name": "A", "email": "a@x.com", "password": "pw"})
        );
        assert!(read_file(&path)["citizens"].as_array().unwrap().is_empty());
        assert!(matches!(
            archive.citizen_snapshot(),
            Err(StoreError::Snapshot { .. })
        ));
    }

    #[test]
    fn archive_missing_citizen_writes_nothing() {
        let (_dir, mut db) = open_temp();
        db.add_citizen(&citizen("CT-1")).unwrap();
        let before = std::fs::read(db.path()).unwrap();

        assert!(matches!(
            db.archive_citizen("CT-404", "gone"),
            Err(StoreError::NotFound)
        ));
        assert_eq!(std::fs::read(db.path()).unwrap(), before);
    }

    #[test]
    fn restore_reinstates_and_keeps_archive() {
        let (_dir, mut db) = open_temp();
        let original = Citizen::new("CT-1", "A", "a@x.com", "09171234567", "pw");
        db.add_citizen(&original).unwrap();
        db.archive_citizen("CT-1", "test").unwrap();

        let restored = db.restore_citizen("CT-1").unwrap();
        assert_eq!(restored, original);
        assert_eq!(db.get_citizen("CT-1").unwrap(), original);
        assert_eq!(db.list_archives_by_type(ArchiveType::DeletedCitizen).len(), 1);
    }

    #[test]
    fn restore_without_archive_is_not_found() {
        let (_dir, mut db) = open_temp();
        assert!(matches!(
            db.restore_citizen("CT-1"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn restore_of_active_citizen_is_a_duplicate() {
        let (_dir, mut db) = open_temp();
        db.add_citizen(&citizen("CT-1")).unwrap();
        db.archive_citizen("CT-1", "first").unwrap();
        db.restore_citizen("CT-1").unwrap();

        assert!(matches!(
            db.restore_citizen("CT-1"),
            Err(StoreError::DuplicateId { .. })
        ));
        assert_eq!(db.list_citizens().len(), 1);
    }

    #[test]
    fn restore_uses_most_recent_archive() {
        let (_dir, mut db) = open_temp();
        db.add_citizen(&Citizen::new("CT-1", "Old Name", "a@x.com", "09171234567", "pw"))
            .unwrap();
        let first = db.archive_citizen("CT-1", "first").unwrap();
        db.restore_citizen("CT-1").unwrap();

        db.update_citizen(
            "CT-1",
            &Citizen::new("CT-1", "New Name", "a@x.com", "09171234567", "pw"),
        )
        .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = db.archive_citizen("CT-1", "second").unwrap();
        assert_ne!(first.archive_id, second.archive_id);

        let restored = db.restore_citizen("CT-1").unwrap();
        assert_eq!(restored.name, "New Name");
        assert_eq!(db.list_archives().len(), 2);
    }

    #[test]
    fn restore_duplicates_when_uniqueness_is_off() {
        let config = StoreConfig {
            enforce_unique_ids: false,
            ..StoreConfig::default()
        };
        let (_dir, mut db) = open_temp_with(config);
        db.add_citizen(&citizen("CT-1")).unwrap();
        db.archive_citizen("CT-1", "r").unwrap();
        db.restore_citizen("CT-1").unwrap();
        db.restore_citizen("CT-1").unwrap();
        assert_eq!(db.list_citizens().len(), 2);
    }

    #[test]
    fn archive_actor_comes_from_config() {
        let config = StoreConfig {
            archive_actor: "CLERK-7".to_string(),
            ..StoreConfig::default()
        };
        let (_dir, mut db) = open_temp_with(config);
        db.add_citizen(&citizen("CT-1")).unwrap();
        assert_eq!(db.archive_citizen("CT-1", "").unwrap().archived_by, "CLERK-7");
    }

    #[test]
    fn finalized_requests_are_archived_by_outcome() {
        let (_dir, mut db) = open_temp();
        db.add_request(&request("REQ-1", "CT-1")).unwrap();
        db.add_request(&request("REQ-2", "CT-1")).unwrap();

        assert!(matches!(
            db.archive_request("REQ-1", "early"),
            Err(StoreError::NotArchivable { .. })
        ));

        let mut done = request("REQ-1", "CT-1");
        done.status = RequestStatus::Completed;
        db.update_request("REQ-1", &done).unwrap();
        let mut denied = request("REQ-2", "CT-1");
        denied.status = RequestStatus::Rejected;
        db.update_request("REQ-2", &denied).unwrap();

        let completed = db.archive_request("REQ-1", "released").unwrap();
        let rejected = db.archive_request("REQ-2", "incomplete").unwrap();
        assert_eq!(completed.archive_type, ArchiveType::CompletedRequest);
        assert_eq!(rejected.archive_type, ArchiveType::RejectedRequest);

        let snapshot: ServiceRequest = completed.request_snapshot().unwrap();
        assert_eq!(snapshot, db.get_request("REQ-1").unwrap());
        // live requests stay
        assert_eq!(db.list_requests().len(), 2);
        assert!(matches!(
            db.archive_request("REQ-404", ""),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn only_rejected_documents_are_archived() {
        let (_dir, mut db) = open_temp();
        let mut doc = document("DOC-1", "REQ-1", "CT-1");
        db.add_document(&doc).unwrap();

        assert!(matches!(
            db.archive_document("DOC-1", ""),
            Err(StoreError::NotArchivable { .. })
        ));

        doc.set_status(DocumentStatus::Rejected);
        db.update_document("DOC-1", &doc).unwrap();
        let archive = db.archive_document("DOC-1", "unreadable").unwrap();
        assert_eq!(archive.archive_type, ArchiveType::RejectedDocument);
        assert_eq!(archive.document_snapshot().unwrap().status, DocumentStatus::Rejected);
        assert_eq!(db.list_documents().len(), 1);
        assert_eq!(
            db.get_archive_by_entity("DOC-1", ArchiveType::RejectedDocument)
                .unwrap(),
            archive
        );
    }

    #[test]
    fn intake_scenario() {
        let (_dir, mut db) = open_temp();
        db.add_citizen(&Citizen::new("CT-1", "A", "a@x.com", "09171234567", "pw"))
            .unwrap();
        db.add_request(&ServiceRequest::new("REQ-1", "CT-1", "Permit", "d"))
            .unwrap();
        let mut doc = document("DOC-1", "REQ-1", "CT-1");
        doc.file_path = "/f".to_string();
        db.add_document(&doc).unwrap();

        let attached = db.list_documents_for_request("REQ-1");
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].id, "DOC-1");
        assert_eq!(attached[0].status, DocumentStatus::Pending);
    }
}
