/// Default file name of the backing JSON document
pub const DATABASE_FILE_NAME: &str = "database.json";

/// Top-level collection keys of the persisted document
pub const CITIZENS: &str = "citizens";
pub const DOCUMENTS: &str = "documents";
pub const REQUESTS: &str = "requests";
pub const ARCHIVES: &str = "archives";

/// All collection keys, in the order they are written
pub const COLLECTIONS: [&str; 4] = [CITIZENS, DOCUMENTS, REQUESTS, ARCHIVES];

/// Actor recorded as `archivedBy` when no other identity is configured
pub const DEFAULT_ARCHIVE_ACTOR: &str = "ADMIN";

/// Identifier prefixes
pub const CITIZEN_ID_PREFIX: &str = "CT";
pub const REQUEST_ID_PREFIX: &str = "REQ";
pub const DOCUMENT_ID_PREFIX: &str = "DOC";
pub const ARCHIVE_ID_PREFIX: &str = "ARCH";

/// Indentation used when pretty-printing the backing file
pub const JSON_INDENT: &[u8] = b"    ";
