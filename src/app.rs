//! Wiring shared by the binary and the integration tests.

use crate::config::{Config, SiteConfig};
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use crate::services::*;
use crate::swagger::swagger_config;
use crate::utils::JwtService;
use actix_web::web;
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub session_store: SessionStore,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub admin_service: AdminService,
    pub site: SiteConfig,
}

impl AppState {
    pub fn new(pool: DatabaseConnection, config: &Config) -> Self {
        let jwt_service = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expires_in,
            config.jwt.refresh_token_expires_in,
        );
        Self::from_parts(pool, jwt_service, config.site.clone())
    }

    pub fn from_parts(pool: DatabaseConnection, jwt_service: JwtService, site: SiteConfig) -> Self {
        let session_store = SessionStore::new();
        Self {
            auth_service: AuthService::new(pool.clone(), jwt_service.clone(), session_store.clone()),
            user_service: UserService::new(pool.clone()),
            admin_service: AdminService::new(pool, site.clone()),
            jwt_service,
            session_store,
            site,
        }
    }

    pub fn auth_middleware(&self) -> AuthMiddleware {
        AuthMiddleware::new(self.jwt_service.clone(), self.session_store.clone())
    }

    /// Registers shared state and every route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.auth_service.clone()))
            .app_data(web::Data::new(self.user_service.clone()))
            .app_data(web::Data::new(self.admin_service.clone()))
            .app_data(web::Data::new(self.site.clone()))
            .configure(swagger_config)
            .configure(handlers::home_config)
            .configure(handlers::auth_config)
            .configure(handlers::settings_config)
            .configure(handlers::admin_config);
    }
}
