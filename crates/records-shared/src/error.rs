use thiserror::Error;

/// Rejections produced by the input validators.
///
/// The store never validates; callers run these checks before handing a
/// record over.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("Invalid name: only letters, dots and spaces are allowed")]
    InvalidName,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid mobile number: {0} (expected 09XXXXXXXXX, +639XXXXXXXXX or 639XXXXXXXXX)")]
    InvalidNumber(String),

    #[error("Password is required")]
    EmptyPassword,
}
