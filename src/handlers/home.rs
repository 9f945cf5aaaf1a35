use super::optional_user;
use crate::config::SiteConfig;
use crate::models::*;
use crate::services::AuthService;
use actix_web::{HttpRequest, HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/",
    tag = "home",
    responses(
        (status = 200, description = "Home page context", body = PageResponse)
    )
)]
pub async fn home(
    auth_service: web::Data<AuthService>,
    site: web::Data<SiteConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = optional_user(&auth_service, &req).await;
    let page = PageResponse {
        context: SiteContext::new(&site.name, user.map(UserResponse::from)),
        form: vec![],
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

pub fn home_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home));
}
