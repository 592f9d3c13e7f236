/// Input validators for registration and login payloads
///
/// The gateway enforces all input policy here; the hasher and token service
/// have no length rules of their own. Emails are case-insensitive across the
/// whole system: they are trimmed and lowercased once, on the way in, so the
/// store's unique index and lookups always agree.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MAX_NAME_LENGTH: usize = 256;
// bcrypt only reads the first 72 bytes of input; longer passwords would
// silently collide, so they are rejected up front.
const MAX_PASSWORD_LENGTH: usize = 72;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Validates and normalizes an email address.
///
/// Returns the trimmed, lowercased form that every other component works
/// with.
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let normalized = normalize_email(email);

    if normalized.is_empty() {
        return Err(ValidationError::EmptyField("email"));
    }

    if normalized.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email", MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(&normalized) {
        return Err(ValidationError::InvalidFormat("email"));
    }

    Ok(normalized)
}

/// Lowercases and trims an email without judging its format.
///
/// Login uses this directly: a malformed email there is simply an unknown
/// account and must fail exactly like a wrong password.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates a display name: non-empty, bounded, no control characters.
pub fn is_valid_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("nome"));
    }

    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong("nome", MAX_NAME_LENGTH));
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat("nome"));
    }

    Ok(trimmed.to_string())
}

/// Validates a password: non-empty and within the bcrypt input ceiling.
/// No strength policy beyond that.
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("senha"));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong("senha", MAX_PASSWORD_LENGTH));
    }

    Ok(())
}
