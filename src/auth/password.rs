/// Password hashing and verification
///
/// bcrypt with a per-call random salt: hashing the same password twice
/// produces two different strings, both of which verify.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// Hash a password with bcrypt.
///
/// Input policy (non-empty, 72 byte ceiling) is the gateway's job, enforced
/// in `validators` before this is called.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// Verify a password against a stored bcrypt hash.
///
/// A malformed hash string is not an error: it can never match, so it
/// verifies as `false`.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or(false)
}
