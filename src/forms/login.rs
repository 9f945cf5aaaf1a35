use super::FormField;
use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::utils::PHONE_NUMBER_MAX_LENGTH;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const INVALID_LOGIN_MESSAGE: &str = "Please enter a correct phone number and password.";
pub const BLOCKED_USER_MESSAGE: &str = "This user is blocked.";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginForm {
    #[schema(example = "+998901234567")]
    pub phone_number: String,
    #[schema(example = "abc")]
    pub password: String,
}

impl LoginForm {
    pub fn fields() -> Vec<FormField> {
        vec![
            FormField::text("phone_number", "Phone Number")
                .max_length(PHONE_NUMBER_MAX_LENGTH)
                .placeholder("Enter your phone number"),
            FormField::password("password", "Password")
                .autocomplete("current-password")
                .placeholder("Enter your password"),
        ]
    }

    /// Field-level checks. The phone number is trimmed, the password is taken verbatim.
    pub fn clean(self) -> AppResult<Self> {
        let phone_number = self.phone_number.trim().to_string();
        if phone_number.is_empty() || self.password.is_empty() {
            return Err(AppError::ValidationError(
                "Phone number and password are required".to_string(),
            ));
        }
        if phone_number.chars().count() > PHONE_NUMBER_MAX_LENGTH {
            return Err(AppError::ValidationError(format!(
                "Ensure the phone number has at most {PHONE_NUMBER_MAX_LENGTH} characters"
            )));
        }
        Ok(Self {
            phone_number,
            password: self.password,
        })
    }

    /// Runs once credentials have matched a user.
    pub fn confirm_login_allowed(user: &users::Model) -> AppResult<()> {
        if !user.is_active {
            return Err(AppError::AuthError(BLOCKED_USER_MESSAGE.to_string()));
        }
        Ok(())
    }
}
