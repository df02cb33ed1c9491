//! Input validation for citizen registration and profile edits.
//!
//! These mirror the checks the front end applies before a record reaches the
//! store. Nothing in the store layer calls them.

use crate::error::ValidationError;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Letters, dots and spaces; at least one character.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == '.' || c == ' ')
    {
        Ok(())
    } else {
        Err(ValidationError::InvalidName)
    }
}

/// `local@domain.tld` where the top-level label has at least two word
/// characters.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let is_part_char = |c: char| is_word_char(c) || c == '.' || c == '-';

    if local.is_empty() || !local.chars().all(is_part_char) {
        return Err(invalid());
    }

    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || !host.chars().all(is_part_char) {
        return Err(invalid());
    }
    if tld.chars().count() < 2 || !tld.chars().all(is_word_char) {
        return Err(invalid());
    }
    Ok(())
}

/// Philippine mobile number in one of the three accepted spellings.
pub fn validate_number(number: &str) -> Result<(), ValidationError> {
    let digits = |s: &str| s.len() == 9 && s.bytes().all(|b| b.is_ascii_digit());

    let ok = if let Some(rest) = number.strip_prefix("+639") {
        digits(rest)
    } else if let Some(rest) = number.strip_prefix("639") {
        digits(rest)
    } else if let Some(rest) = number.strip_prefix("09") {
        digits(rest)
    } else {
        false
    };

    if ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidNumber(number.to_string()))
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        Err(ValidationError::EmptyPassword)
    } else {
        Ok(())
    }
}

/// Run every check a new citizen registration goes through.
pub fn validate_citizen(
    name: &str,
    email: &str,
    number: &str,
    password: &str,
) -> Result<(), ValidationError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_number(number)?;
    validate_password(password)
}
