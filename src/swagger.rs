use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::UserStatus;
use crate::forms::*;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home::home,
        handlers::auth::login_page,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::register_page,
        handlers::auth::register,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::settings::update_page,
        handlers::settings::update_profile,
        handlers::settings::deactivate_account,
        handlers::settings::reactivate_account,
        handlers::settings::delete_account,
        handlers::admin::admin_index,
        handlers::admin::list_users,
        handlers::admin::add_user_form,
        handlers::admin::create_user,
        handlers::admin::get_user,
        handlers::admin::update_user,
        handlers::admin::delete_user,
    ),
    components(
        schemas(
            UserStatus,
            UserResponse,
            TokenPair,
            AuthResponse,
            RefreshRequest,
            ProfileUpdateResponse,
            SiteContext,
            PageResponse,
            Redirect,
            FormField,
            LoginForm,
            RegisterForm,
            UpdateProfileForm,
            AdminCreateUserForm,
            AdminUpdateUserForm,
            AdminSiteResponse,
            AdminUserQuery,
            AdminUserRow,
            AdminUserDetail,
            LoginFieldset,
            PermissionsFieldset,
            ImportantDatesFieldset,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "home", description = "Landing page"),
        (name = "auth", description = "Login, logout and registration"),
        (name = "settings", description = "Profile and account lifecycle"),
        (name = "admin", description = "Staff user administration"),
    ),
    info(
        title = "Phone Number Auth API",
        version = "0.1.0",
        description = "Phone-number based account management"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
