//! Human-readable record identifiers.
//!
//! Identifiers embed the owning citizen and a timestamp rather than a random
//! component, so two ids minted for the same owner within the same second
//! (or millisecond, for archives) collide. Callers check for an existing id
//! before inserting.

use chrono::NaiveDateTime;

use crate::constants::{
    ARCHIVE_ID_PREFIX, CITIZEN_ID_PREFIX, DOCUMENT_ID_PREFIX, REQUEST_ID_PREFIX,
};

/// `CT-<n>-<MMddyy>-<HHmm>-<ss>` where `n` is the citizen count after
/// registration.
pub fn citizen_id(existing_citizens: usize, now: NaiveDateTime) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        CITIZEN_ID_PREFIX,
        existing_citizens + 1,
        now.format("%m%d%y"),
        now.format("%H%M"),
        now.format("%S"),
    )
}

/// `REQ-<citizenId>-<MMddyy-HHmmss>`
pub fn request_id(citizen_id: &str, now: NaiveDateTime) -> String {
    format!(
        "{}-{}-{}",
        REQUEST_ID_PREFIX,
        citizen_id,
        now.format("%m%d%y-%H%M%S")
    )
}

/// `DOC-<citizenId>-<MMddyy-HHmmss>`
pub fn document_id(citizen_id: &str, now: NaiveDateTime) -> String {
    format!(
        "{}-{}-{}",
        DOCUMENT_ID_PREFIX,
        citizen_id,
        now.format("%m%d%y-%H%M%S")
    )
}

/// `ARCH-<entityId>-<epoch millis>`
pub fn archive_id(entity_id: &str, epoch_millis: i64) -> String {
    format!("{}-{}-{}", ARCHIVE_ID_PREFIX, entity_id, epoch_millis)
}
