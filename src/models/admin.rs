use crate::entities::{UserStatus, user_entity as users};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminSiteResponse {
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
}

/// Search, filters and paging of the user changelist.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminUserQuery {
    /// Substring of the phone number.
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub status: Option<UserStatus>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// One changelist row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminUserRow {
    pub id: i64,
    pub phone_number: String,
    pub status: UserStatus,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

impl From<users::Model> for AdminUserRow {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            phone_number: user.phone_number,
            status: user.status,
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            last_login: user.last_login,
            date_joined: user.date_joined,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginFieldset {
    pub phone_number: String,
    /// Algorithm prefix of the stored hash, never the hash itself.
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionsFieldset {
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
    pub status: UserStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportantDatesFieldset {
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Change-form view of a user, grouped the way the admin screen shows it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminUserDetail {
    pub login: LoginFieldset,
    pub permissions: PermissionsFieldset,
    pub important_dates: ImportantDatesFieldset,
    pub id: i64,
    pub display: String,
}

impl From<users::Model> for AdminUserDetail {
    fn from(user: users::Model) -> Self {
        let password = if !user.has_usable_password() {
            "No password set.".to_string()
        } else {
            // bcrypt hashes look like `$2b$12$...`
            let algorithm = user.password.split('$').nth(1).unwrap_or("unknown");
            format!("algorithm: bcrypt ({algorithm})")
        };
        Self {
            display: user.to_string(),
            id: user.id,
            login: LoginFieldset {
                phone_number: user.phone_number,
                password,
            },
            permissions: PermissionsFieldset {
                is_superuser: user.is_superuser,
                is_staff: user.is_staff,
                is_active: user.is_active,
                status: user.status,
            },
            important_dates: ImportantDatesFieldset {
                date_joined: user.date_joined,
                last_login: user.last_login,
            },
        }
    }
}
