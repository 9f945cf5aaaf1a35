use crate::entities::{UserStatus, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::forms::{PHONE_TAKEN_MESSAGE, UpdateProfileForm};
use crate::utils::hash_password;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, Set,
};

/// Outcome of a successful profile update.
#[derive(Debug)]
pub struct ProfileUpdate {
    pub user: users::Model,
    pub password_changed: bool,
}

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn phone_taken_by_other(&self, phone_number: &str, user_id: i64) -> AppResult<bool> {
        let count = users::Entity::find()
            .filter(users::Column::PhoneNumber.eq(phone_number))
            .filter(users::Column::Id.ne(user_id))
            .count(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Applies a self-service profile change. Every rule is checked before anything
    /// is written and the first failing one is reported.
    pub async fn update_profile(
        &self,
        user: users::Model,
        form: &UpdateProfileForm,
    ) -> AppResult<ProfileUpdate> {
        let new_phone = form.validate_phone_change(&user)?;
        if let Some(phone) = &new_phone {
            if self.phone_taken_by_other(phone, user.id).await? {
                return Err(AppError::ValidationError(PHONE_TAKEN_MESSAGE.to_string()));
            }
        }
        let new_password = form.validate_password_change(&user)?;

        if new_phone.is_none() && new_password.is_none() {
            return Ok(ProfileUpdate {
                user,
                password_changed: false,
            });
        }

        let password_changed = new_password.is_some();
        let mut model = user.into_active_model();
        if let Some(phone) = new_phone {
            model.phone_number = Set(phone);
        }
        if let Some(password) = new_password {
            model.password = Set(hash_password(&password)?);
        }

        // a concurrent registration can still claim the number between check and write
        let user = model
            .update(&self.pool)
            .await
            .map_err(|e| AppError::from_db_unique(e, PHONE_TAKEN_MESSAGE))?;

        log::info!("User {user} updated profile (password changed: {password_changed})");
        Ok(ProfileUpdate {
            user,
            password_changed,
        })
    }

    pub async fn deactivate(&self, user_id: i64) -> AppResult<users::Model> {
        let mut model = self.get_user(user_id).await?.into_active_model();
        model.status = Set(UserStatus::Deactive);
        let user = model.update(&self.pool).await?;
        log::info!("User {user} deactivated");
        Ok(user)
    }

    /// Only a currently deactivated user can be reactivated; anything else is not found.
    pub async fn reactivate(&self, user_id: i64) -> AppResult<users::Model> {
        let user = users::Entity::find_by_id(user_id)
            .filter(users::Column::Status.eq(UserStatus::Deactive))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut model = user.into_active_model();
        model.status = Set(UserStatus::Active);
        let user = model.update(&self.pool).await?;
        log::info!("User {user} reactivated");
        Ok(user)
    }

    /// Permanently removes the record.
    pub async fn delete(&self, user_id: i64) -> AppResult<()> {
        let result = users::Entity::delete_by_id(user_id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        log::info!("User {user_id} permanently deleted");
        Ok(())
    }
}
