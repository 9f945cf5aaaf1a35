use super::current_user;
use crate::config::SiteConfig;
use crate::error::AppError;
use crate::forms::UpdateProfileForm;
use crate::models::*;
use crate::services::{AdminService, AuthService, UserService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

const REACTIVATION_FAILED_MESSAGE: &str = "An error occurred while reactivating your account.";

/// Validation failures send the client back to the update form with the message.
fn back_to_update_form(error: AppError) -> HttpResponse {
    match error {
        AppError::ValidationError(message) => {
            log::warn!("Profile update rejected: {message}");
            HttpResponse::BadRequest().json(json!({
                "success": false,
                "data": Redirect { redirect_to: UPDATE_PROFILE_ROUTE.to_string() },
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": message
                }
            }))
        }
        other => other.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/settings/update/",
    tag = "settings",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile update form", body = PageResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn update_page(
    auth_service: web::Data<AuthService>,
    site: web::Data<SiteConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let (_, user) = current_user(&auth_service, &req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(PageResponse {
        context: SiteContext::new(&site.name, Some(UserResponse::from(user))),
        form: UpdateProfileForm::fields(),
    })))
}

#[utoipa::path(
    post,
    path = "/settings/update/",
    tag = "settings",
    request_body = UpdateProfileForm,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile updated", body = ProfileUpdateResponse),
        (status = 400, description = "A validation rule failed"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn update_profile(
    auth_service: web::Data<AuthService>,
    user_service: web::Data<UserService>,
    req: HttpRequest,
    form: web::Json<UpdateProfileForm>,
) -> Result<HttpResponse> {
    let (claims, user) = current_user(&auth_service, &req).await?;

    let update = match user_service.update_profile(user, &form).await {
        Ok(update) => update,
        Err(e) => return Ok(back_to_update_form(e)),
    };

    // keep the caller logged in across their own password change
    let tokens = if update.password_changed {
        Some(auth_service.rebind_session(&claims, &update.user)?)
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        ProfileUpdateResponse {
            user: UserResponse::from(update.user),
            tokens,
            redirect_to: HOME_ROUTE.to_string(),
        },
        "Your profile has been updated successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/settings/deactivate/",
    tag = "settings",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Account deactivated and logged out"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn deactivate_account(
    auth_service: web::Data<AuthService>,
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let (claims, user) = current_user(&auth_service, &req).await?;

    match user_service.deactivate(user.id).await {
        Ok(_) => {
            auth_service.end_session(&claims).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
                Redirect::home(),
                "Your account has been deactivated.",
            )))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/settings/reactivate/{user_id}/",
    tag = "settings",
    params(
        ("user_id" = i64, Path, description = "Id of the deactivated user")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Account reactivated", body = UserResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "No deactivated user with this id"),
        (status = 500, description = "Reactivation failed")
    )
)]
pub async fn reactivate_account(
    auth_service: web::Data<AuthService>,
    user_service: web::Data<UserService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let (_, caller) = current_user(&auth_service, &req).await?;
    AdminService::ensure_staff(&caller)?;
    let user_id = path.into_inner();

    match user_service.reactivate(user_id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            json!({
                "user": UserResponse::from(user),
                "redirect_to": HOME_ROUTE
            }),
            "Your account has been reactivated.",
        ))),
        Err(e @ AppError::NotFound(_)) => Ok(e.error_response()),
        Err(e) => {
            log::error!("Failed to reactivate user {user_id}: {e}");
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "REACTIVATION_FAILED".to_string(),
                REACTIVATION_FAILED_MESSAGE.to_string(),
            )))
        }
    }
}

#[utoipa::path(
    post,
    path = "/settings/delete/",
    tag = "settings",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Account permanently deleted"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn delete_account(
    auth_service: web::Data<AuthService>,
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let (claims, user) = current_user(&auth_service, &req).await?;

    // the session ends before the record goes away
    auth_service.end_session(&claims).await;
    match user_service.delete(user.id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            Redirect::home(),
            "Your account has been permanently deleted.",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn settings_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("/update/", web::get().to(update_page))
            .route("/update/", web::post().to(update_profile))
            .route("/deactivate/", web::post().to(deactivate_account))
            .route("/reactivate/{user_id}/", web::post().to(reactivate_account))
            .route("/delete/", web::post().to(delete_account)),
    );
}
