use super::current_user;
use crate::entities::user_entity as users;
use crate::error::AppResult;
use crate::forms::{AdminCreateUserForm, AdminUpdateUserForm};
use crate::models::*;
use crate::services::{AdminService, AuthService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

async fn staff_user(auth_service: &AuthService, req: &HttpRequest) -> AppResult<users::Model> {
    let (_, user) = current_user(auth_service, req).await?;
    AdminService::ensure_staff(&user)?;
    Ok(user)
}

#[utoipa::path(
    get,
    path = "/admin/",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Admin site titles", body = AdminSiteResponse),
        (status = 403, description = "Caller is not staff")
    )
)]
pub async fn admin_index(
    auth_service: web::Data<AuthService>,
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    staff_user(&auth_service, &req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(admin_service.site())))
}

#[utoipa::path(
    get,
    path = "/admin/users/",
    tag = "admin",
    params(AdminUserQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Filtered, paginated user list"),
        (status = 403, description = "Caller is not staff")
    )
)]
pub async fn list_users(
    auth_service: web::Data<AuthService>,
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    query: web::Query<AdminUserQuery>,
) -> Result<HttpResponse> {
    staff_user(&auth_service, &req).await?;
    match admin_service.list_users(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users/add/",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Fields of the create-user form"),
        (status = 403, description = "Caller is not staff")
    )
)]
pub async fn add_user_form(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    staff_user(&auth_service, &req).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "title": "Create Super User",
            "form": AdminCreateUserForm::fields()
        }
    })))
}

#[utoipa::path(
    post,
    path = "/admin/users/",
    tag = "admin",
    request_body = AdminCreateUserForm,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "User created", body = AdminUserDetail),
        (status = 400, description = "Invalid form"),
        (status = 403, description = "Caller is not staff"),
        (status = 409, description = "Phone number already taken")
    )
)]
pub async fn create_user(
    auth_service: web::Data<AuthService>,
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    form: web::Json<AdminCreateUserForm>,
) -> Result<HttpResponse> {
    staff_user(&auth_service, &req).await?;
    match admin_service.create_user(form.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Created().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users/{user_id}/",
    tag = "admin",
    params(
        ("user_id" = i64, Path, description = "User id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User change form", body = AdminUserDetail),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    auth_service: web::Data<AuthService>,
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    staff_user(&auth_service, &req).await?;
    match admin_service.get_user(path.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/users/{user_id}/",
    tag = "admin",
    request_body = AdminUpdateUserForm,
    params(
        ("user_id" = i64, Path, description = "User id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User updated", body = AdminUserDetail),
        (status = 400, description = "Invalid form"),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    auth_service: web::Data<AuthService>,
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
    form: web::Json<AdminUpdateUserForm>,
) -> Result<HttpResponse> {
    staff_user(&auth_service, &req).await?;
    match admin_service
        .update_user(path.into_inner(), form.into_inner())
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/users/{user_id}/",
    tag = "admin",
    params(
        ("user_id" = i64, Path, description = "User id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    auth_service: web::Data<AuthService>,
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    staff_user(&auth_service, &req).await?;
    let user_id = path.into_inner();
    match admin_service.delete_user(user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("User {user_id} deleted")
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/", web::get().to(admin_index))
            .route("/users/", web::get().to(list_users))
            .route("/users/", web::post().to(create_user))
            .route("/users/add/", web::get().to(add_user_form))
            .route("/users/{user_id}/", web::get().to(get_user))
            .route("/users/{user_id}/", web::put().to(update_user))
            .route("/users/{user_id}/", web::delete().to(delete_user)),
    );
}
