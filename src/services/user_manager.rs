use crate::entities::{UserStatus, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::forms::PHONE_TAKEN_MESSAGE;
use crate::utils::{hash_password, make_unusable_password};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Optional attributes of a new user; `None` keeps the default.
#[derive(Debug, Clone, Default)]
pub struct ExtraFields {
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub status: Option<UserStatus>,
}

/// The only place users are created; passwords are hashed before they are stored.
#[derive(Clone)]
pub struct UserManager {
    pool: DatabaseConnection,
}

impl UserManager {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_user(
        &self,
        phone_number: &str,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> AppResult<users::Model> {
        if phone_number.is_empty() {
            return Err(AppError::ValidationError(
                "Users must have a phone number".to_string(),
            ));
        }

        let password = match password {
            Some(password) => hash_password(password)?,
            None => make_unusable_password(),
        };

        let user = users::ActiveModel {
            phone_number: Set(phone_number.to_string()),
            password: Set(password),
            status: Set(extra.status.unwrap_or(UserStatus::Active)),
            is_staff: Set(extra.is_staff.unwrap_or(false)),
            is_superuser: Set(extra.is_superuser.unwrap_or(false)),
            last_login: Set(None),
            date_joined: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| AppError::from_db_unique(e, PHONE_TAKEN_MESSAGE))?;

        log::info!("Created user {user}");
        Ok(user)
    }

    pub async fn create_superuser(
        &self,
        phone_number: &str,
        password: Option<&str>,
        mut extra: ExtraFields,
    ) -> AppResult<users::Model> {
        let is_staff = *extra.is_staff.get_or_insert(true);
        let is_superuser = *extra.is_superuser.get_or_insert(true);

        if !is_staff {
            return Err(AppError::ValidationError(
                "Admin must be is_staff=True".to_string(),
            ));
        }
        if !is_superuser {
            return Err(AppError::ValidationError(
                "Admin must be is_superuser=True".to_string(),
            ));
        }

        self.create_user(phone_number, password, extra).await
    }

    /// Creates the configured superuser unless the phone number is already registered.
    pub async fn ensure_superuser(&self, phone_number: &str, password: &str) -> AppResult<bool> {
        let existing = users::Entity::find()
            .filter(users::Column::PhoneNumber.eq(phone_number))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }
        self.create_superuser(phone_number, Some(password), ExtraFields::default())
            .await?;
        Ok(true)
    }
}
