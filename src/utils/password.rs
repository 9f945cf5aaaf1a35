use crate::error::{AppError, AppResult};
use bcrypt::{DEFAULT_COST, hash, verify};
use uuid::Uuid;

pub const PASSWORD_MIN_LENGTH: usize = 3;

/// Checks applied to every newly chosen password.
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::ValidationError(
            "New password cannot be empty".to_string(),
        ));
    }
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(AppError::ValidationError(format!(
            "New password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))
}

/// Unusable hashes (`!` prefix) never verify.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    if hash.starts_with('!') {
        return Ok(false);
    }
    verify(password, hash)
        .map_err(|e| AppError::InternalError(format!("Failed to verify password: {e}")))
}

/// Placeholder stored for accounts created without a password.
pub fn make_unusable_password() -> String {
    format!("!{}", Uuid::new_v4().simple())
}

/// Fingerprint of a stored password hash. Sessions carry it so that a password
/// change invalidates every session not explicitly re-bound.
pub fn session_auth_hash(password_hash: &str) -> String {
    format!("{:x}", md5::compute(password_hash.as_bytes()))
}
