mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use common::*;
use phone_number_auth::entities::UserStatus;
use serde_json::json;

#[actix_web::test]
async fn admin_requires_staff() {
    let (db, state) = setup_state().await;
    create_user(&db, "+998901234567", "abc").await;
    let app = init_app!(state);
    let token = login!(app, "+998901234567", "abc");

    let (status, body) = send!(
        app,
        TestRequest::get().uri("/admin/").insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = send!(app, TestRequest::get().uri("/admin/users/"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admin_index_uses_configured_titles() {
    let (db, state) = setup_state().await;
    create_staff(&db).await;
    let app = init_app!(state);
    let token = login!(app, STAFF_PHONE, STAFF_PASSWORD);

    let (status, body) = send!(
        app,
        TestRequest::get().uri("/admin/").insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["site_header"], "phone-number-auth Admin Panel");
    assert_eq!(body["data"]["site_title"], "phone-number-auth Admin Panel");
    assert_eq!(
        body["data"]["index_title"],
        "Welcome to phone-number-auth Admin Panel"
    );
}

#[actix_web::test]
async fn user_list_is_searchable_and_filterable() {
    let (db, state) = setup_state().await;
    create_staff(&db).await;
    create_user(&db, "+998901234567", "abc").await;
    let blocked = create_user(&db, "+998907654321", "abc").await;
    create_user(&db, "12345678901", "abc").await;
    state.user_service.deactivate(blocked.id).await.unwrap();
    let app = init_app!(state);
    let token = login!(app, STAFF_PHONE, STAFF_PASSWORD);

    let (status, body) = send!(
        app,
        TestRequest::get().uri("/admin/users/").insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 4);
    let phones: Vec<&str> = body["data"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|row| row["phone_number"].as_str())
        .collect();
    assert_eq!(
        phones,
        ["+998900000001", "+998901234567", "+998907654321", "12345678901"]
    );

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/admin/users/?search=9012")
            .insert_header(bearer(&token))
    );
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["phone_number"], "+998901234567");

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/admin/users/?status=deactive")
            .insert_header(bearer(&token))
    );
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["is_active"], false);

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/admin/users/?is_staff=true")
            .insert_header(bearer(&token))
    );
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["phone_number"], STAFF_PHONE);

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/admin/users/?page=2&page_size=3")
            .insert_header(bearer(&token))
    );
    assert_eq!(body["data"]["total_pages"], 2);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn staff_creates_a_user() {
    let (db, state) = setup_state().await;
    create_staff(&db).await;
    let app = init_app!(state);
    let token = login!(app, STAFF_PHONE, STAFF_PASSWORD);

    let (status, body) = send!(
        app,
        TestRequest::get()
            .uri("/admin/users/add/")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Create Super User");

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/admin/users/")
            .insert_header(bearer(&token))
            .set_json(json!({
                "phone_number": "+998901234567",
                "password1": "abc",
                "password2": "abd"
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "The two password fields didn't match");

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/admin/users/")
            .insert_header(bearer(&token))
            .set_json(json!({
                "phone_number": "+998901234567",
                "password1": "abc",
                "password2": "abc",
                "is_staff": true
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["login"]["phone_number"], "+998901234567");
    assert_eq!(body["data"]["permissions"]["is_staff"], true);
    assert_eq!(body["data"]["permissions"]["is_superuser"], false);

    login!(app, "+998901234567", "abc");
}

#[actix_web::test]
async fn staff_blocks_and_deletes_a_user() {
    let (db, state) = setup_state().await;
    create_staff(&db).await;
    let user = create_user(&db, "+998901234567", "abc").await;
    let app = init_app!(state);
    let token = login!(app, STAFF_PHONE, STAFF_PASSWORD);

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/admin/users/{}/", user.id))
            .insert_header(bearer(&token))
            .set_json(json!({ "is_active": false }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["permissions"]["status"], "deactive");
    let stored = reload(&db, user.id).await.unwrap();
    assert_eq!(stored.status, UserStatus::Deactive);
    assert!(!stored.is_active);

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/auth/login/").set_json(json!({
            "phone_number": "+998901234567",
            "password": "abc"
        }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "This user is blocked.");

    let (status, _) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/admin/users/{}/", user.id))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(reload(&db, user.id).await.is_none());

    let (status, _) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/admin/users/{}/", user.id))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_treats_wildcards_literally() {
    let (db, state) = setup_state().await;
    create_staff(&db).await;
    create_user(&db, "+998901234567", "abc").await;
    let app = init_app!(state);
    let token = login!(app, STAFF_PHONE, STAFF_PASSWORD);

    for search in ["%25", "_", "9%250", "9_0"] {
        let (status, body) = send!(
            app,
            TestRequest::get()
                .uri(&format!("/admin/users/?search={search}"))
                .insert_header(bearer(&token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 0, "search {search:?} matched");
    }
}

#[actix_web::test]
async fn huge_page_number_returns_an_empty_page() {
    let (db, state) = setup_state().await;
    create_staff(&db).await;
    let app = init_app!(state);
    let token = login!(app, STAFF_PHONE, STAFF_PASSWORD);

    let (status, body) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/admin/users/?page={}&page_size=500", u64::MAX))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert!(body["data"]["data"].as_array().unwrap().is_empty());
}
