use crate::forms::FormField;
use crate::models::UserResponse;
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Values every rendered page receives.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SiteContext {
    pub site_name: String,
    /// `None` for anonymous visitors.
    pub user: Option<UserResponse>,
    pub current_year: i32,
}

impl SiteContext {
    pub fn new(site_name: &str, user: Option<UserResponse>) -> Self {
        Self {
            site_name: site_name.to_string(),
            user,
            current_year: Local::now().year(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageResponse {
    pub context: SiteContext,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub form: Vec<FormField>,
}
