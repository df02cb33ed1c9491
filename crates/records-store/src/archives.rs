//! Lookups and inserts for [`Archive`] records.
//!
//! Archive records are append-only: nothing here edits or deletes them.

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Archive, ArchiveType};

impl Database {
    /// Append an archive record and save.
    pub fn add_to_archive(&mut self, archive: &Archive) -> Result<()> {
        self.insert(archive)?;
        tracing::info!(
            archive_id = %archive.archive_id,
            entity_id = %archive.entity_id,
            archive_type = %archive.archive_type,
            "archived"
        );
        Ok(())
    }

    pub fn list_archives(&self) -> Vec<Archive> {
        self.decode_all()
    }

    pub fn list_archives_by_type(&self, archive_type: ArchiveType) -> Vec<Archive> {
        self.decode_where(|a: &Archive| a.archive_type == archive_type)
    }

    pub fn get_archive(&self, archive_id: &str) -> Result<Archive> {
        self.find(archive_id)
    }

    /// First archive, in stored order, of the given type for an entity.
    pub fn get_archive_by_entity(
        &self,
        entity_id: &str,
        archive_type: ArchiveType,
    ) -> Result<Archive> {
        self.decode_where(|a: &Archive| a.entity_id == entity_id && a.archive_type == archive_type)
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    /// Most recent archive of the given type for an entity.
    ///
    /// Ordered by `archivedAt`; records archived at the same instant are
    /// broken by stored order, later wins.
    pub fn latest_archive_for(
        &self,
        entity_id: &str,
        archive_type: ArchiveType,
    ) -> Result<Archive> {
        self.decode_where(|a: &Archive| a.entity_id == entity_id && a.archive_type == archive_type)
            .into_iter()
            .enumerate()
            .max_by_key(|(position, a)| (a.archived_at, *position))
            .map(|(_, a)| a)
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use crate::error::StoreError;
    use crate::models::{Archive, ArchiveType};
    use crate::test_support::open_temp;

    fn archive(id: &str, entity: &str, archive_type: ArchiveType, minute: u32) -> Archive {
        let mut archive = Archive::new(id, entity, archive_type, "{}", "ADMIN", "");
        archive.archived_at = NaiveDate::from_ymd_opt(2025, 11, 26)
            .unwrap()
            .and_hms_opt(10, minute, 0)
            .unwrap();
        archive
    }

    #[test]
    fn add_and_lookup() {
        let (_dir, mut db) = open_temp();
        let a = archive("ARCH-1", "CT-1", ArchiveType::DeletedCitizen, 0);
        let b = archive("ARCH-2", "REQ-1", ArchiveType::RejectedRequest, 1);
        let c = archive("ARCH-3", "DOC-1", ArchiveType::RejectedDocument, 2);
        for record in [&a, &b, &c] {
            db.add_to_archive(record).unwrap();
        }

        assert_eq!(db.list_archives(), vec![a.clone(), b.clone(), c.clone()]);
        assert_eq!(db.list_archives_by_type(ArchiveType::RejectedRequest), vec![b]);
        assert!(db.list_archives_by_type(ArchiveType::CompletedRequest).is_empty());
        assert_eq!(db.get_archive("ARCH-3").unwrap(), c);
        assert!(matches!(db.get_archive("ARCH-9"), Err(StoreError::NotFound)));
        assert_eq!(
            db.get_archive_by_entity("CT-1", ArchiveType::DeletedCitizen).unwrap(),
            a
        );
        assert!(matches!(
            db.get_archive_by_entity("CT-1", ArchiveType::CompletedRequest),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn first_match_versus_latest() {
        let (_dir, mut db) = open_temp();
        let newer = archive("ARCH-NEW", "CT-1", ArchiveType::DeletedCitizen, 30);
        let older = archive("ARCH-OLD", "CT-1", ArchiveType::DeletedCitizen, 5);
        db.add_to_archive(&newer).unwrap();
        db.add_to_archive(&older).unwrap();

        let first = db.get_archive_by_entity("CT-1", ArchiveType::DeletedCitizen).unwrap();
        assert_eq!(first.archive_id, "ARCH-NEW");
        let latest = db.latest_archive_for("CT-1", ArchiveType::DeletedCitizen).unwrap();
        assert_eq!(latest.archive_id, "ARCH-NEW");

        let mut later = older.clone();
        later.archive_id = "ARCH-LATER".to_string();
        later.archived_at = newer.archived_at + Duration::minutes(1);
        db.add_to_archive(&later).unwrap();
        let latest = db.latest_archive_for("CT-1", ArchiveType::DeletedCitizen).unwrap();
        assert_eq!(latest.archive_id, "ARCH-LATER");
    }

    #[test]
    fn same_instant_prefers_later_record() {
        let (_dir, mut db) = open_temp();
        db.add_to_archive(&archive("ARCH-A", "CT-1", ArchiveType::DeletedCitizen, 0))
            .unwrap();
        db.add_to_archive(&archive("ARCH-B", "CT-1", ArchiveType::DeletedCitizen, 0))
            .unwrap();

        let latest = db.latest_archive_for("CT-1", ArchiveType::DeletedCitizen).unwrap();
        assert_eq!(latest.archive_id, "ARCH-B");
    }

    #[test]
    fn archive_ids_are_unique() {
        let (_dir, mut db) = open_temp();
        let a = archive("ARCH-1", "CT-1", ArchiveType::DeletedCitizen, 0);
        db.add_to_archive(&a).unwrap();
        assert!(matches!(
            db.add_to_archive(&a),
            Err(StoreError::DuplicateId { collection: "archives", .. })
        ));
    }
}
