use super::FormField;
use crate::entities::UserStatus;
use crate::error::{AppError, AppResult};
use crate::utils::{PHONE_NUMBER_MAX_LENGTH, validate_password, validate_phone_number};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// "Create Super User" screen of the admin panel.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminCreateUserForm {
    pub phone_number: String,
    pub password1: String,
    pub password2: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_staff: bool,
}

impl AdminCreateUserForm {
    pub fn fields() -> Vec<FormField> {
        vec![
            FormField::text("phone_number", "Phone Number").max_length(PHONE_NUMBER_MAX_LENGTH),
            FormField::password("password1", "Password").autocomplete("new-password"),
            FormField::password("password2", "Password confirmation").autocomplete("new-password"),
            FormField::checkbox("is_superuser", "Superuser status"),
            FormField::checkbox("is_staff", "Staff status"),
        ]
    }

    pub fn clean(self) -> AppResult<Self> {
        let phone_number = self.phone_number.trim().to_string();
        validate_phone_number(&phone_number)?;
        validate_password(&self.password1)?;
        if self.password1 != self.password2 {
            return Err(AppError::ValidationError(
                "The two password fields didn't match".to_string(),
            ));
        }
        Ok(Self {
            phone_number,
            ..self
        })
    }
}

/// Change screen. Identifier and timestamps are read-only and not accepted here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AdminUpdateUserForm {
    pub phone_number: Option<String>,
    pub is_superuser: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
    pub status: Option<UserStatus>,
}

impl AdminUpdateUserForm {
    /// Folds `is_active` into `status`, which is what gets persisted.
    pub fn resolved_status(&self) -> AppResult<Option<UserStatus>> {
        match (self.status, self.is_active) {
            (Some(status), Some(is_active)) if status.is_active() != is_active => {
                Err(AppError::ValidationError(
                    "Status and active flag disagree".to_string(),
                ))
            }
            (Some(status), _) => Ok(Some(status)),
            (None, Some(is_active)) => Ok(Some(UserStatus::from_is_active(is_active))),
            (None, None) => Ok(None),
        }
    }

    pub fn clean(self) -> AppResult<Self> {
        let phone_number = match self.phone_number {
            Some(phone) => {
                let phone = phone.trim().to_string();
                validate_phone_number(&phone)?;
                Some(phone)
            }
            None => None,
        };
        Ok(Self {
            phone_number,
            ..self
        })
    }
}
