#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use phone_number_auth::app::AppState;
use phone_number_auth::config::SiteConfig;
use phone_number_auth::entities::user_entity as users;
use phone_number_auth::services::{ExtraFields, UserManager};
use phone_number_auth::utils::JwtService;
use sea_orm::{Database, DatabaseConnection, EntityTrait};

pub const STAFF_PHONE: &str = "+998900000001";
pub const STAFF_PASSWORD: &str = "staff-pass";

/// Fresh in-memory SQLite database with the schema applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn setup_state() -> (DatabaseConnection, AppState) {
    let db = setup_db().await;
    let jwt_service = JwtService::new("test-secret", 3600, 86_400);
    let state = AppState::from_parts(db.clone(), jwt_service, SiteConfig::default());
    (db, state)
}

pub async fn create_staff(db: &DatabaseConnection) -> users::Model {
    UserManager::new(db.clone())
        .create_superuser(STAFF_PHONE, Some(STAFF_PASSWORD), ExtraFields::default())
        .await
        .expect("Failed to create staff user")
}

pub async fn create_user(db: &DatabaseConnection, phone: &str, password: &str) -> users::Model {
    UserManager::new(db.clone())
        .create_user(phone, Some(password), ExtraFields::default())
        .await
        .expect("Failed to create user")
}

pub async fn reload(db: &DatabaseConnection, id: i64) -> Option<users::Model> {
    users::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("Failed to load user")
}

/// Builds the app service with the same middleware and routes as the server.
#[macro_export]
macro_rules! init_app {
    ($state:expr) => {{
        let state = $state.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(state.auth_middleware())
                .configure(|cfg| state.configure(cfg)),
        )
        .await
    }};
}

/// Sends a request and returns `(status, json body)`, including responses produced
/// by middleware errors.
#[macro_export]
macro_rules! send {
    ($app:expr, $req:expr) => {{
        match actix_web::test::try_call_service(&$app, $req.to_request()).await {
            Ok(resp) => {
                let status = resp.status();
                let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
                (status, body)
            }
            Err(err) => {
                let resp = err.error_response();
                let status = resp.status();
                let bytes = actix_web::body::to_bytes(resp.into_body())
                    .await
                    .expect("readable error body");
                let body: serde_json::Value =
                    serde_json::from_slice(&bytes).expect("json error body");
                (status, body)
            }
        }
    }};
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Logs in through the API and returns the access token.
#[macro_export]
macro_rules! login {
    ($app:expr, $phone:expr, $password:expr) => {{
        let (status, body) = $crate::send!(
            $app,
            actix_web::test::TestRequest::post()
                .uri("/auth/login/")
                .set_json(serde_json::json!({ "phone_number": $phone, "password": $password }))
        );
        assert_eq!(status, actix_web::http::StatusCode::OK, "login failed: {body}");
        body["data"]["access_token"]
            .as_str()
            .expect("access token")
            .to_string()
    }};
}
