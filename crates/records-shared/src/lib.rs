//! # records-shared
//!
//! Pieces shared by the records office store and its front ends: collection
//! and file-name constants, identifier formats, and the input validators
//! applied before a record is handed to the store.

pub mod constants;
pub mod ids;
pub mod validate;

mod error;

pub use error::ValidationError;
