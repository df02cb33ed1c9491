//! Generic record operations over the four collections.
//!
//! Each entity type implements [`Record`]; the per-entity modules expose
//! named CRUD methods that delegate here.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use records_shared::constants::{ARCHIVES, CITIZENS, DOCUMENTS, REQUESTS};

use crate::database::{Database, Root};
use crate::error::{Result, StoreError};
use crate::models::{Archive, Citizen, Document, ServiceRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Collection {
    Citizens,
    Documents,
    Requests,
    Archives,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Citizens => CITIZENS,
            Collection::Documents => DOCUMENTS,
            Collection::Requests => REQUESTS,
            Collection::Archives => ARCHIVES,
        }
    }

    fn of(self, root: &Root) -> &Vec<Value> {
        match self {
            Collection::Citizens => &root.citizens,
            Collection::Documents => &root.documents,
            Collection::Requests => &root.requests,
            Collection::Archives => &root.archives,
        }
    }

    fn of_mut(self, root: &mut Root) -> &mut Vec<Value> {
        match self {
            Collection::Citizens => &mut root.citizens,
            Collection::Documents => &mut root.documents,
            Collection::Requests => &mut root.requests,
            Collection::Archives => &mut root.archives,
        }
    }
}

/// A typed view of one record in a collection.
pub(crate) trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;
    /// JSON field holding the record's key.
    const KEY: &'static str = "id";
    /// Fields an update copies from the new value onto the stored object.
    const MUTABLE_FIELDS: &'static [&'static str];

    fn key(&self) -> &str;
}

impl Record for Citizen {
    const COLLECTION: Collection = Collection::Citizens;
    const MUTABLE_FIELDS: &'static [&'static str] = &["name", "email", "number", "password"];

    fn key(&self) -> &str {
        &self.id
    }
}

impl Record for Document {
    const COLLECTION: Collection = Collection::Documents;
    const MUTABLE_FIELDS: &'static [&'static str] = &["status", "reviewComment", "reviewTime"];

    fn key(&self) -> &str {
        &self.id
    }
}

impl Record for ServiceRequest {
    const COLLECTION: Collection = Collection::Requests;
    const MUTABLE_FIELDS: &'static [&'static str] = &["status", "adminNote"];

    fn key(&self) -> &str {
        &self.id
    }
}

impl Record for Archive {
    const COLLECTION: Collection = Collection::Archives;
    const KEY: &'static str = "archiveId";
    // archives are never edited in place
    const MUTABLE_FIELDS: &'static [&'static str] = &[];

    fn key(&self) -> &str {
        &self.archive_id
    }
}

/// Key of a raw record, if it has a string one.
pub(crate) fn key_of<'a>(raw: &'a Value, key_field: &str) -> Option<&'a str> {
    raw.get(key_field).and_then(Value::as_str)
}

impl Database {
    pub(crate) fn raw<R: Record>(&self) -> &[Value] {
        R::COLLECTION.of(&self.root)
    }

    pub(crate) fn raw_mut<R: Record>(&mut self) -> &mut Vec<Value> {
        R::COLLECTION.of_mut(&mut self.root)
    }

    /// Decode one raw record, logging and discarding it when malformed.
    pub(crate) fn decode<R: Record>(index: usize, raw: &Value) -> Option<R> {
        match R::deserialize(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    collection = R::COLLECTION.name(),
                    index,
                    id = key_of(raw, R::KEY).unwrap_or("<none>"),
                    error = %e,
                    "skipping malformed record"
                );
                None
            }
        }
    }

    /// Every decodable record, in stored order.
    pub(crate) fn decode_all<R: Record>(&self) -> Vec<R> {
        self.decode_where(|_: &R| true)
    }

    /// Decodable records matching `keep`, in stored order.
    pub(crate) fn decode_where<R: Record>(&self, keep: impl Fn(&R) -> bool) -> Vec<R> {
        self.raw::<R>()
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| Self::decode::<R>(index, raw))
            .filter(|record| keep(record))
            .collect()
    }

    /// First decodable record whose key equals `key`.
    pub(crate) fn find<R: Record>(&self, key: &str) -> Result<R> {
        self.raw::<R>()
            .iter()
            .enumerate()
            .filter(|(_, raw)| key_of(raw, R::KEY) == Some(key))
            .find_map(|(index, raw)| Self::decode::<R>(index, raw))
            .ok_or(StoreError::NotFound)
    }

    /// Like [`find`](Self::find), also returning a copy of the stored JSON
    /// object exactly as it is on disk.
    pub(crate) fn find_with_raw<R: Record>(&self, key: &str) -> Result<(R, Value)> {
        self.raw::<R>()
            .iter()
            .enumerate()
            .filter(|(_, raw)| key_of(raw, R::KEY) == Some(key))
            .find_map(|(index, raw)| Self::decode::<R>(index, raw).map(|r| (r, raw.clone())))
            .ok_or(StoreError::NotFound)
    }

    /// First stored object with the given key, whether or not it decodes.
    pub(crate) fn find_raw<R: Record>(&self, key: &str) -> Result<Value> {
        self.raw::<R>()
            .iter()
            .find(|raw| key_of(raw, R::KEY) == Some(key))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    pub(crate) fn contains<R: Record>(&self, key: &str) -> bool {
        self.raw::<R>()
            .iter()
            .any(|raw| key_of(raw, R::KEY) == Some(key))
    }

    /// Append a record to its collection without persisting.
    ///
    /// Fails with [`StoreError::DuplicateId`] when uniqueness is enforced
    /// and the key is already present.
    pub(crate) fn push<R: Record>(&mut self, record: &R) -> Result<()> {
        if self.config().enforce_unique_ids && self.contains::<R>(record.key()) {
            return Err(StoreError::DuplicateId {
                collection: R::COLLECTION.name(),
                id: record.key().to_string(),
            });
        }
        let raw = serde_json::to_value(record)?;
        self.raw_mut::<R>().push(raw);
        Ok(())
    }

    /// Append a record and save.
    pub(crate) fn insert<R: Record>(&mut self, record: &R) -> Result<()> {
        self.sync_from_disk()?;
        self.push(record)?;
        self.commit()?;

        tracing::debug!(
            collection = R::COLLECTION.name(),
            id = record.key(),
            "record added"
        );
        Ok(())
    }

    /// Drop every record with the given key and save. Returns `false`
    /// without writing when nothing matched.
    pub(crate) fn remove<R: Record>(&mut self, key: &str) -> Result<bool> {
        self.sync_from_disk()?;

        let records = self.raw_mut::<R>();
        let before = records.len();
        records.retain(|raw| key_of(raw, R::KEY) != Some(key));
        let removed = before - records.len();
        if removed == 0 {
            return Ok(false);
        }

        self.commit()?;
        tracing::debug!(
            collection = R::COLLECTION.name(),
            id = key,
            removed,
            "record deleted"
        );
        Ok(true)
    }

    /// Copy the mutable fields of `record` onto the first stored record
    /// with the given key and save. Fields `record` serializes without
    /// (such as an unset review time) keep their stored value. Returns
    /// `false` without writing when nothing matched.
    pub(crate) fn patch<R: Record>(&mut self, key: &str, record: &R) -> Result<bool> {
        self.sync_from_disk()?;

        let update = match serde_json::to_value(record)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(StoreError::Parse(serde::ser::Error::custom(
                    "record did not serialize to an object",
                )))
            }
        };

        let Some(target) = self
            .raw_mut::<R>()
            .iter_mut()
            .find(|raw| key_of(raw, R::KEY) == Some(key))
            .and_then(Value::as_object_mut)
        else {
            return Ok(false);
        };

        for field in R::MUTABLE_FIELDS {
            if let Some(value) = update.get(*field) {
                target.insert(field.to_string(), value.clone());
            }
        }

        self.commit()?;
        tracing::debug!(collection = R::COLLECTION.name(), id = key, "record updated");
        Ok(true)
    }
}
