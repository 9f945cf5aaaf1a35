use super::FormField;
use crate::error::{AppError, AppResult};
use crate::utils::{PHONE_NUMBER_MAX_LENGTH, validate_password, validate_phone_number};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterForm {
    #[schema(example = "+998901234567")]
    pub phone_number: String,
    #[schema(example = "abc")]
    pub password: String,
    #[schema(example = "abc")]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn fields() -> Vec<FormField> {
        vec![
            FormField::text("phone_number", "Phone Number")
                .max_length(PHONE_NUMBER_MAX_LENGTH)
                .placeholder("Enter your phone number"),
            FormField::password("password", "Password")
                .autocomplete("new-password")
                .placeholder("Enter your password"),
            FormField::password("confirm_password", "Confirm Password")
                .autocomplete("new-password")
                .placeholder("Repeat your password"),
        ]
    }

    /// Uniqueness of the phone number is left to the database.
    pub fn clean(self) -> AppResult<Self> {
        let phone_number = self.phone_number.trim().to_string();
        if phone_number.is_empty() {
            return Err(AppError::ValidationError(
                "Users must have a phone number".to_string(),
            ));
        }
        validate_phone_number(&phone_number)?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(AppError::ValidationError(
                "Password and confirm password do not match".to_string(),
            ));
        }
        Ok(Self {
            phone_number,
            ..self
        })
    }
}
