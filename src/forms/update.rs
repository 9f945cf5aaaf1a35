use super::{FormField, non_empty};
use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::utils::{PHONE_NUMBER_MAX_LENGTH, validate_password, validate_phone_number, verify_password};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PHONE_TAKEN_MESSAGE: &str = "This phone number is already taken";

fn invalid(message: &str) -> AppError {
    AppError::ValidationError(message.to_string())
}

/// Self-service profile change. Every field is optional; blank counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileForm {
    pub current_phone_number: Option<String>,
    #[schema(example = "12345678901")]
    pub phone_number: Option<String>,
    pub current_password: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl UpdateProfileForm {
    pub fn fields() -> Vec<FormField> {
        vec![
            FormField::text("current_phone_number", "Current Phone Number")
                .max_length(PHONE_NUMBER_MAX_LENGTH)
                .optional(),
            FormField::text("phone_number", "New Phone Number")
                .max_length(PHONE_NUMBER_MAX_LENGTH)
                .placeholder("Enter your new phone number")
                .optional(),
            FormField::password("current_password", "Current Password")
                .autocomplete("current-password")
                .optional(),
            FormField::password("password", "New Password")
                .autocomplete("new-password")
                .optional(),
            FormField::password("confirm_password", "Confirm Password")
                .autocomplete("new-password")
                .optional(),
        ]
    }

    /// Checks a requested phone change against `user`, returning the new number.
    /// Ownership by another account is checked separately against the database.
    pub fn validate_phone_change(&self, user: &users::Model) -> AppResult<Option<String>> {
        let Some(new_phone) = non_empty(&self.phone_number) else {
            return Ok(None);
        };

        if let Some(current_phone) = non_empty(&self.current_phone_number) {
            if current_phone != user.phone_number {
                return Err(invalid("Current phone number is incorrect"));
            }
            if new_phone == user.phone_number {
                return Err(invalid(
                    "New phone number cannot be the same as current phone number",
                ));
            }
        }

        validate_phone_number(new_phone)?;
        Ok(Some(new_phone.to_string()))
    }

    /// Checks a requested password change against `user`, returning the new
    /// plaintext password.
    pub fn validate_password_change(&self, user: &users::Model) -> AppResult<Option<String>> {
        let new_password = non_empty(&self.password);
        let confirm_password = non_empty(&self.confirm_password);
        if new_password.is_none() && confirm_password.is_none() {
            return Ok(None);
        }

        let Some(current_password) = non_empty(&self.current_password) else {
            return Err(invalid(
                "Please enter your current password to change password",
            ));
        };
        if !verify_password(current_password, &user.password)? {
            return Err(invalid("Current password is incorrect"));
        }

        let Some(new_password) = new_password else {
            return Err(invalid("New password cannot be empty"));
        };
        if new_password == current_password {
            return Err(invalid(
                "New password cannot be the same as current password",
            ));
        }
        validate_password(new_password)?;
        if Some(new_password) != confirm_password {
            return Err(invalid(
                "New password and confirm password do not match",
            ));
        }

        Ok(Some(new_password.to_string()))
    }
}
