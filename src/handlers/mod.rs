pub mod admin;
pub mod auth;
pub mod home;
pub mod settings;

pub use admin::admin_config;
pub use auth::auth_config;
pub use home::home_config;
pub use settings::settings_config;

use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::middlewares::get_session_claims;
use crate::services::AuthService;
use crate::utils::Claims;
use actix_web::HttpRequest;

/// Session claims and the live user behind them; fails for anonymous or stale sessions.
pub(crate) async fn current_user(
    auth_service: &AuthService,
    req: &HttpRequest,
) -> AppResult<(Claims, users::Model)> {
    let claims = get_session_claims(req)
        .ok_or_else(|| AppError::AuthError("Authentication required".to_string()))?;
    let user = auth_service.resolve_session(&claims).await?;
    Ok((claims, user))
}

/// Like [`current_user`] but treats any failure as an anonymous visitor.
pub(crate) async fn optional_user(
    auth_service: &AuthService,
    req: &HttpRequest,
) -> Option<users::Model> {
    let claims = get_session_claims(req)?;
    auth_service.resolve_session(&claims).await.ok()
}
