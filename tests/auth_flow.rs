mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use common::*;
use phone_number_auth::entities::UserStatus;
use phone_number_auth::error::AppError;
use phone_number_auth::services::{ExtraFields, UserManager};
use sea_orm::ConnectionTrait;
use serde_json::{Value, json};

fn register_body(phone: &str, password: &str) -> Value {
    json!({
        "phone_number": phone,
        "password": password,
        "confirm_password": password
    })
}

fn login_body(phone: &str, password: &str) -> Value {
    json!({ "phone_number": phone, "password": password })
}

#[actix_web::test]
async fn register_logs_the_user_in() {
    let (_db, state) = setup_state().await;
    let app = init_app!(state);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/auth/register/")
            .set_json(register_body("+998901234567", "abc"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["phone_number"], "+998901234567");
    assert_eq!(body["data"]["user"]["status"], "active");
    assert_eq!(body["data"]["redirect_to"], "/");

    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    let (status, body) = send!(
        app,
        TestRequest::get().uri("/auth/me/").insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone_number"], "+998901234567");
}

#[actix_web::test]
async fn register_rejects_mismatched_confirmation() {
    let (_db, state) = setup_state().await;
    let app = init_app!(state);

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/auth/register/").set_json(json!({
            "phone_number": "+998901234567",
            "password": "abc",
            "confirm_password": "abd"
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Password and confirm password do not match"
    );
}

#[actix_web::test]
async fn duplicate_phone_number_is_rejected() {
    let (db, state) = setup_state().await;
    create_user(&db, "+998901234567", "abc").await;

    let err = UserManager::new(db.clone())
        .create_user("+998901234567", Some("xyz"), ExtraFields::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let app = init_app!(state);
    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/auth/register/")
            .set_json(register_body("+998901234567", "abc"))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "This phone number is already taken");
}

#[actix_web::test]
async fn wrong_password_and_unknown_phone_look_the_same() {
    let (db, state) = setup_state().await;
    create_user(&db, "+998901234567", "abc").await;
    let app = init_app!(state);

    let (status, wrong_password) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body("+998901234567", "nope"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_phone) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body("+998909999999", "abc"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password["error"]["message"],
        "Please enter a correct phone number and password."
    );
    assert_eq!(wrong_password["error"], unknown_phone["error"]);
}

#[actix_web::test]
async fn login_records_last_login() {
    let (db, state) = setup_state().await;
    let user = create_user(&db, "+998901234567", "abc").await;
    assert!(user.last_login.is_none());
    let app = init_app!(state);

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body("+998901234567", "abc"))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(reload(&db, user.id).await.unwrap().last_login.is_some());
}

#[actix_web::test]
async fn deactivated_user_cannot_log_in() {
    let (db, state) = setup_state().await;
    let user = create_user(&db, "+998901234567", "abc").await;
    state.user_service.deactivate(user.id).await.unwrap();
    let app = init_app!(state);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body("+998901234567", "abc"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "This user is blocked.");
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let (db, state) = setup_state().await;
    create_user(&db, "+998901234567", "abc").await;
    let app = init_app!(state);

    let (_, body) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body("+998901234567", "abc"))
    );
    let access = body["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/auth/logout/").insert_header(bearer(&access))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You have been logged out.");

    let (status, _) = send!(
        app,
        TestRequest::get().uri("/auth/me/").insert_header(bearer(&access))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/auth/refresh/")
            .set_json(json!({ "refresh_token": refresh }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn refresh_issues_a_working_access_token() {
    let (db, state) = setup_state().await;
    create_user(&db, "+998901234567", "abc").await;
    let app = init_app!(state);

    let (_, body) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body("+998901234567", "abc"))
    );
    let refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/auth/refresh/")
            .set_json(json!({ "refresh_token": refresh }))
    );
    assert_eq!(status, StatusCode::OK);
    let access = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, _) = send!(
        app,
        TestRequest::get().uri("/auth/me/").insert_header(bearer(&access))
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn protected_routes_need_a_session() {
    let (_db, state) = setup_state().await;
    let app = init_app!(state);

    let (status, _) = send!(app, TestRequest::get().uri("/settings/update/"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send!(
        app,
        TestRequest::get()
            .uri("/auth/me/")
            .insert_header(bearer("not-a-token"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn home_page_shows_the_current_user() {
    let (db, state) = setup_state().await;
    create_user(&db, "+998901234567", "abc").await;
    let app = init_app!(state);

    let (status, body) = send!(app, TestRequest::get().uri("/"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["context"]["site_name"], "Phone Number Auth");
    assert!(body["data"]["context"]["user"].is_null());

    let (_, login) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body("+998901234567", "abc"))
    );
    let access = login["data"]["access_token"].as_str().unwrap().to_string();
    let (_, body) = send!(
        app,
        TestRequest::get().uri("/").insert_header(bearer(&access))
    );
    assert_eq!(
        body["data"]["context"]["user"]["phone_number"],
        "+998901234567"
    );
}

#[actix_web::test]
async fn deactivate_then_staff_reactivates() {
    let (db, state) = setup_state().await;
    let staff = create_staff(&db).await;
    assert!(staff.is_staff && staff.is_superuser);
    let app = init_app!(state);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/auth/register/")
            .set_json(register_body("+998901234567", "abc"))
    );
    assert_eq!(status, StatusCode::OK);
    let user_id = body["data"]["user"]["id"].as_i64().unwrap();
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, _) = send!(
        app,
        TestRequest::get().uri("/auth/me/").insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/settings/deactivate/")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Your account has been deactivated.");
    let stored = reload(&db, user_id).await.unwrap();
    assert_eq!(stored.status, UserStatus::Deactive);
    assert!(!stored.is_active);

    let (status, _) = send!(
        app,
        TestRequest::get().uri("/auth/me/").insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, login) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body(STAFF_PHONE, STAFF_PASSWORD))
    );
    let staff_token = login["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/settings/reactivate/{user_id}/"))
            .insert_header(bearer(&staff_token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Your account has been reactivated.");
    assert_eq!(body["data"]["user"]["status"], "active");

    let stored = reload(&db, user_id).await.unwrap();
    assert_eq!(stored.status, UserStatus::Active);
    assert!(stored.is_active);

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body("+998901234567", "abc"))
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn reactivating_an_active_user_is_not_found() {
    let (db, state) = setup_state().await;
    create_staff(&db).await;
    let user = create_user(&db, "+998901234567", "abc").await;
    let app = init_app!(state);

    let (_, login) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body(STAFF_PHONE, STAFF_PASSWORD))
    );
    let staff_token = login["data"]["access_token"].as_str().unwrap().to_string();

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/settings/reactivate/{}/", user.id))
            .insert_header(bearer(&staff_token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/settings/reactivate/9999/")
            .insert_header(bearer(&staff_token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn reactivation_requires_staff() {
    let (db, state) = setup_state().await;
    let other = create_user(&db, "+998901111111", "abc").await;
    state.user_service.deactivate(other.id).await.unwrap();
    create_user(&db, "+998901234567", "abc").await;
    let app = init_app!(state);

    let (_, login) = send!(
        app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_json(login_body("+998901234567", "abc"))
    );
    let token = login["data"]["access_token"].as_str().unwrap().to_string();

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/settings/reactivate/{}/", other.id))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        reload(&db, other.id).await.unwrap().status,
        UserStatus::Deactive
    );
}

#[actix_web::test]
async fn failed_reactivation_answers_with_a_generic_error() {
    let (db, state) = setup_state().await;
    create_staff(&db).await;
    let user = create_user(&db, "+998901234567", "abc").await;
    state.user_service.deactivate(user.id).await.unwrap();
    let app = init_app!(state);
    let staff_token = login!(app, STAFF_PHONE, STAFF_PASSWORD);

    db.execute_unprepared(
        "CREATE TRIGGER reject_reactivation BEFORE UPDATE ON users \
         WHEN OLD.status = 'deactive' AND NEW.status = 'active' \
         BEGIN SELECT RAISE(ABORT, 'reactivation rejected'); END",
    )
    .await
    .unwrap();

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/settings/reactivate/{}/", user.id))
            .insert_header(bearer(&staff_token))
    );
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "REACTIVATION_FAILED");
    assert_eq!(
        body["error"]["message"],
        "An error occurred while reactivating your account."
    );

    let stored = reload(&db, user.id).await.unwrap();
    assert_eq!(stored.status, UserStatus::Deactive);
    assert!(!stored.is_active);
}
