use crate::entities::user_entity as users;
use crate::error::AppResult;
use crate::utils::verify_password;
use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Resolves credentials to a user. `Ok(None)` means "no match here" so the next
/// backend gets a chance; errors are reserved for infrastructure failures.
#[async_trait]
pub trait AuthenticationBackend: Send + Sync {
    async fn authenticate(
        &self,
        phone_number: &str,
        password: &str,
    ) -> AppResult<Option<users::Model>>;
}

/// Authenticates by phone number instead of username.
#[derive(Clone)]
pub struct PhoneBackend {
    pool: DatabaseConnection,
}

impl PhoneBackend {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthenticationBackend for PhoneBackend {
    async fn authenticate(
        &self,
        phone_number: &str,
        password: &str,
    ) -> AppResult<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::PhoneNumber.eq(phone_number))
            .one(&self.pool)
            .await?;

        let Some(user) = user else {
            log::debug!("PhoneBackend: no user with phone {phone_number}");
            return Ok(None);
        };

        if verify_password(password, &user.password)? {
            log::debug!("PhoneBackend: authenticated user {user}");
            Ok(Some(user))
        } else {
            log::debug!("PhoneBackend: wrong password for user {user}");
            Ok(None)
        }
    }
}
