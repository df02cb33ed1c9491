//! Domain model structs persisted in the JSON document.
//!
//! Field names on disk are camelCase; enum values are uppercase string
//! literals. Every struct derives `Serialize` and `Deserialize` so it can be
//! handed directly to the UI layer.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, StoreError};

/// Current local wall-clock time, the clock every stored timestamp uses.
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Serde adapter for local timestamps.
///
/// Writes `YYYY-MM-DDTHH:MM:SS[.fraction]`. Also reads the minute-only form
/// (`YYYY-MM-DDTHH:MM`) found in files written when the seconds were zero.
pub(crate) mod local_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FULL: &str = "%Y-%m-%dT%H:%M:%S%.f";
    const MINUTES: &str = "%Y-%m-%dT%H:%M";

    pub fn format(ts: &NaiveDateTime) -> String {
        ts.format(FULL).to_string()
    }

    pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, FULL)
            .or_else(|_| NaiveDateTime::parse_from_str(s, MINUTES))
    }

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ts: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => serializer.serialize_str(&super::format(ts)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// A status or type string that matches no known variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Citizen
// ---------------------------------------------------------------------------

/// A person with an account in the system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citizen {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Mobile number.
    pub number: String,
    /// Stored in plaintext.
    pub password: String,
}

impl Citizen {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        number: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            number: number.into(),
            password: password.into(),
        }
    }

    pub fn verify_password(&self, provided: &str) -> bool {
        self.password == provided
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Pending => "PENDING",
            DocumentStatus::Approved => "APPROVED",
            DocumentStatus::Rejected => "REJECTED",
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            DocumentStatus::Pending => "Pending Review",
            DocumentStatus::Approved => "Approved",
            DocumentStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(DocumentStatus::Pending),
            "APPROVED" => Ok(DocumentStatus::Approved),
            "REJECTED" => Ok(DocumentStatus::Rejected),
            _ => Err(UnknownVariant {
                kind: "document status",
                value: s.to_string(),
            }),
        }
    }
}

/// A file submitted in support of a service request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub request_id: String,
    /// Older files name the request link `attachedRequestId`. Kept as read
    /// so rewrites leave the original field untouched.
    #[serde(
        rename = "attachedRequestId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_request_id: Option<String>,
    pub citizen_id: String,
    pub file_path: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub review_comment: String,
    #[serde(with = "local_time")]
    pub upload_time: NaiveDateTime,
    /// Set whenever the status changes.
    #[serde(
        default,
        with = "local_time::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_time: Option<NaiveDateTime>,
}

impl Document {
    /// A pending document uploaded now.
    pub fn new(
        id: impl Into<String>,
        request_id: impl Into<String>,
        file_path: impl Into<String>,
        citizen_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            request_id: request_id.into(),
            legacy_request_id: None,
            citizen_id: citizen_id.into(),
            file_path: file_path.into(),
            status: DocumentStatus::Pending,
            review_comment: String::new(),
            upload_time: now(),
            review_time: None,
        }
    }

    pub fn set_status(&mut self, status: DocumentStatus) {
        self.status = status;
        self.review_time = Some(now());
    }
}

// ---------------------------------------------------------------------------
// Service request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Requested,
    Processing,
    Completed,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Requested => "REQUESTED",
            RequestStatus::Processing => "PROCESSING",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Rejected => "REJECTED",
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            RequestStatus::Requested => "Requested",
            RequestStatus::Processing => "Processing",
            RequestStatus::Completed => "Completed",
            RequestStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "REQUESTED" => Ok(RequestStatus::Requested),
            "PROCESSING" => Ok(RequestStatus::Processing),
            "COMPLETED" => Ok(RequestStatus::Completed),
            "REJECTED" => Ok(RequestStatus::Rejected),
            _ => Err(UnknownVariant {
                kind: "request status",
                value: s.to_string(),
            }),
        }
    }
}

/// A citizen-submitted request for a government service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: String,
    pub citizen_id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub admin_note: String,
    /// Overwritten with the insert time by the store.
    #[serde(with = "local_time")]
    pub date: NaiveDateTime,
}

impl ServiceRequest {
    pub fn new(
        id: impl Into<String>,
        citizen_id: impl Into<String>,
        service_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            citizen_id: citizen_id.into(),
            service_type: service_type.into(),
            description: description.into(),
            status: RequestStatus::Requested,
            admin_note: String::new(),
            date: now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self.status,
            RequestStatus::Requested | RequestStatus::Processing
        )
    }

    pub fn is_finalized(&self) -> bool {
        matches!(
            self.status,
            RequestStatus::Completed | RequestStatus::Rejected
        )
    }
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArchiveType {
    DeletedCitizen,
    CompletedRequest,
    RejectedRequest,
    RejectedDocument,
}

impl ArchiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveType::DeletedCitizen => "DELETED_CITIZEN",
            ArchiveType::CompletedRequest => "COMPLETED_REQUEST",
            ArchiveType::RejectedRequest => "REJECTED_REQUEST",
            ArchiveType::RejectedDocument => "REJECTED_DOCUMENT",
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            ArchiveType::DeletedCitizen => "Deleted Citizen",
            ArchiveType::CompletedRequest => "Completed Request",
            ArchiveType::RejectedRequest => "Rejected Request",
            ArchiveType::RejectedDocument => "Rejected Document",
        }
    }
}

impl fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchiveType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "DELETED_CITIZEN" => Ok(ArchiveType::DeletedCitizen),
            "COMPLETED_REQUEST" => Ok(ArchiveType::CompletedRequest),
            "REJECTED_REQUEST" => Ok(ArchiveType::RejectedRequest),
            "REJECTED_DOCUMENT" => Ok(ArchiveType::RejectedDocument),
            _ => Err(UnknownVariant {
                kind: "archive type",
                value: s.to_string(),
            }),
        }
    }
}

/// An audit record holding a frozen snapshot of a deleted or finalized
/// entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Archive {
    pub archive_id: String,
    /// Id of the archived entity.
    pub entity_id: String,
    #[serde(rename = "type")]
    pub archive_type: ArchiveType,
    /// The entity's JSON object at archive time, encoded as a string.
    pub details: String,
    #[serde(with = "local_time")]
    pub archived_at: NaiveDateTime,
    pub archived_by: String,
    #[serde(default)]
    pub reason: String,
}

impl Archive {
    pub fn new(
        archive_id: impl Into<String>,
        entity_id: impl Into<String>,
        archive_type: ArchiveType,
        details: impl Into<String>,
        archived_by: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            archive_id: archive_id.into(),
            entity_id: entity_id.into(),
            archive_type,
            details: details.into(),
            archived_at: now(),
            archived_by: archived_by.into(),
            reason: reason.into(),
        }
    }

    fn decode_details<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.details).map_err(|source| StoreError::Snapshot {
            archive_id: self.archive_id.clone(),
            source,
        })
    }

    pub fn citizen_snapshot(&self) -> Result<Citizen> {
        self.decode_details()
    }

    pub fn request_snapshot(&self) -> Result<ServiceRequest> {
        self.decode_details()
    }

    pub fn document_snapshot(&self) -> Result<Document> {
        self.decode_details()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_reads_legacy_field_and_writes_it_back() {
        let raw = json!({
            "id": "DOC-1",
            "requestId": "REQ-1",
            "attachedRequestId": "REQ-1",
            "citizenId": "CT-1",
            "filePath": "/f",
            "status": "PENDING",
            "reviewComment": "",
            "uploadTime": "2025-11-26T15:03:34.123"
        });
        let doc: Document = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.legacy_request_id.as_deref(), Some("REQ-1"));
        assert_eq!(doc.review_time, None);
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn timestamps_accept_minute_precision() {
        let ts = local_time::parse("2025-11-26T15:03").unwrap();
        assert_eq!(local_time::format(&ts), "2025-11-26T15:03:00");

        let precise = local_time::parse("2025-11-26T15:03:34.123456789").unwrap();
        assert_eq!(local_time::format(&precise), "2025-11-26T15:03:34.123456789");
        assert!(local_time::parse("26/11/2025").is_err());
    }

    #[test]
    fn request_defaults_for_missing_optional_fields() {
        let req: ServiceRequest = serde_json::from_value(json!({
            "id": "REQ-1",
            "citizenId": "CT-1",
            "type": "Permit",
            "date": "2025-11-26T15:03:34"
        }))
        .unwrap();
        assert_eq!(req.status, RequestStatus::Requested);
        assert_eq!(req.description, "");
        assert!(req.is_pending());
        assert!(!req.is_finalized());
    }

    #[test]
    fn status_strings() {
        assert_eq!("rejected".parse::<DocumentStatus>(), Ok(DocumentStatus::Rejected));
        assert_eq!("COMPLETED".parse::<RequestStatus>(), Ok(RequestStatus::Completed));
        assert_eq!(
            "deleted-citizen".parse::<ArchiveType>(),
            Ok(ArchiveType::DeletedCitizen)
        );
        assert!("ARCHIVED".parse::<RequestStatus>().is_err());
        assert_eq!(
            serde_json::to_value(ArchiveType::RejectedDocument).unwrap(),
            json!("REJECTED_DOCUMENT")
        );
        assert_eq!(ArchiveType::CompletedRequest.display(), "Completed Request");
    }

    #[test]
    fn status_change_stamps_review_time() {
        let mut doc = Document::new("DOC-1", "REQ-1", "/f", "CT-1");
        assert_eq!(doc.status, DocumentStatus::Pending);
        doc.set_status(DocumentStatus::Approved);
        assert!(doc.review_time.is_some());
    }

    #[test]
    fn archive_snapshot_decodes_citizen() {
        let citizen = Citizen::new("CT-1", "A", "a@x.com", "09171234567", "pw");
        let archive = Archive::new(
            "ARCH-CT-1-1",
            "CT-1",
            ArchiveType::DeletedCitizen,
            serde_json::to_string(&citizen).unwrap(),
            "ADMIN",
            "test",
        );
        assert_eq!(archive.citizen_snapshot().unwrap(), citizen);
        assert!(matches!(
            archive.request_snapshot(),
            Err(StoreError::Snapshot { .. })
        ));
        assert!(citizen.verify_password("pw"));
        assert!(!citizen.verify_password("PW"));
    }
}
