use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

/// Longest phone number the `users.phone_number` column holds.
pub const PHONE_NUMBER_MAX_LENGTH: usize = 15;

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{9,15}$").expect("phone regex is valid"));

/// Optional leading `+`, then 9 to 15 ASCII digits, and no longer than the column allows.
pub fn is_valid_phone_number(phone: &str) -> bool {
    phone.chars().count() <= PHONE_NUMBER_MAX_LENGTH && PHONE_REGEX.is_match(phone)
}

pub fn validate_phone_number(phone: &str) -> AppResult<()> {
    if !is_valid_phone_number(phone) {
        return Err(AppError::ValidationError(
            "Invalid phone number format".to_string(),
        ));
    }
    Ok(())
}
