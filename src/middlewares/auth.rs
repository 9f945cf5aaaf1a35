use crate::error::AppError;
use crate::services::SessionStore;
use crate::utils::{Claims, JwtService};
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

// Paths reachable without a session. A valid session is still attached when present.
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec![
                "/",
                "/auth/login/",
                "/auth/register/",
                "/auth/refresh/",
                "/swagger-ui",
                "/api-docs/openapi.json",
            ],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/"],
        }
    }

    fn is_public_path(&self, path: &str) -> bool {
        if self.exact_paths.contains(&path) {
            return true;
        }

        self.prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
    session_store: SessionStore,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService, session_store: SessionStore) -> Self {
        Self {
            jwt_service,
            session_store,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_service: self.jwt_service.clone(),
            session_store: self.session_store.clone(),
            public_paths: Rc::new(PublicPaths::new()),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_service: JwtService,
    session_store: SessionStore,
    public_paths: Rc<PublicPaths>,
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflight never carries credentials
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let service = Rc::clone(&self.service);
        let jwt_service = self.jwt_service.clone();
        let session_store = self.session_store.clone();
        let is_public = self.public_paths.is_public_path(req.path());
        let token = bearer_token(&req);

        Box::pin(async move {
            let verified = match token.as_deref() {
                Some(token) => match jwt_service.verify_access_token(token) {
                    Ok(claims) => {
                        if session_store.is_revoked(&claims.sid).await {
                            Err(AppError::AuthError("Session has ended".to_string()))
                        } else {
                            Ok(claims)
                        }
                    }
                    Err(_) => Err(AppError::AuthError("Invalid access token".to_string())),
                },
                None => Err(AppError::AuthError("Missing access token".to_string())),
            };

            match verified {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                }
                Err(error) if !is_public => return Err(error.into()),
                Err(_) => {}
            }

            service.call(req).await
        })
    }
}

/// Claims of the session attached to the request, if any.
pub fn get_session_claims(req: &impl HttpMessage) -> Option<Claims> {
    req.extensions().get::<Claims>().cloned()
}
