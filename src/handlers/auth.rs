use super::{current_user, optional_user};
use crate::config::SiteConfig;
use crate::error::AppError;
use crate::forms::{FormField, LoginForm, RegisterForm};
use crate::middlewares::get_session_claims;
use crate::models::*;
use crate::services::AuthService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

async fn form_page(
    auth_service: &AuthService,
    site: &SiteConfig,
    req: &HttpRequest,
    form: Vec<FormField>,
) -> HttpResponse {
    let user = optional_user(auth_service, req).await;
    HttpResponse::Ok().json(ApiResponse::success(PageResponse {
        context: SiteContext::new(&site.name, user.map(UserResponse::from)),
        form,
    }))
}

#[utoipa::path(
    get,
    path = "/auth/login/",
    tag = "auth",
    responses(
        (status = 200, description = "Login form", body = PageResponse)
    )
)]
pub async fn login_page(
    auth_service: web::Data<AuthService>,
    site: web::Data<SiteConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    Ok(form_page(&auth_service, &site, &req, LoginForm::fields()).await)
}

#[utoipa::path(
    post,
    path = "/auth/login/",
    tag = "auth",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Wrong credentials or blocked user")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    form: web::Json<LoginForm>,
) -> Result<HttpResponse> {
    match auth_service.login(form.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout/",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn logout(auth_service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let Some(claims) = get_session_claims(&req) else {
        return Ok(AppError::AuthError("Authentication required".to_string()).error_response());
    };
    auth_service.end_session(&claims).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Redirect::home(),
        "You have been logged out.",
    )))
}

#[utoipa::path(
    get,
    path = "/auth/register/",
    tag = "auth",
    responses(
        (status = 200, description = "Registration form", body = PageResponse)
    )
)]
pub async fn register_page(
    auth_service: web::Data<AuthService>,
    site: web::Data<SiteConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    Ok(form_page(&auth_service, &site, &req, RegisterForm::fields()).await)
}

#[utoipa::path(
    post,
    path = "/auth/register/",
    tag = "auth",
    request_body = RegisterForm,
    responses(
        (status = 200, description = "Registered and logged in", body = AuthResponse),
        (status = 400, description = "Invalid registration data"),
        (status = 409, description = "Phone number already taken")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    form: web::Json<RegisterForm>,
) -> Result<HttpResponse> {
    match auth_service.register(form.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/refresh/",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AuthResponse),
        (status = 401, description = "Invalid or ended session")
    )
)]
pub async fn refresh(
    auth_service: web::Data<AuthService>,
    request: web::Json<RefreshRequest>,
) -> Result<HttpResponse> {
    match auth_service.refresh(&request.refresh_token).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/auth/me/",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn me(auth_service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let (_, user) = current_user(&auth_service, &req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse::from(user))))
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login/", web::get().to(login_page))
            .route("/login/", web::post().to(login))
            .route("/logout/", web::post().to(logout))
            .route("/register/", web::get().to(register_page))
            .route("/register/", web::post().to(register))
            .route("/refresh/", web::post().to(refresh))
            .route("/me/", web::get().to(me)),
    );
}
