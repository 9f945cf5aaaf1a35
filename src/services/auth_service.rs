use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::forms::{INVALID_LOGIN_MESSAGE, LoginForm, RegisterForm};
use crate::models::*;
use crate::services::{AuthenticationBackend, ExtraFields, PhoneBackend, SessionStore, UserManager};
use crate::utils::*;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use std::sync::Arc;
use uuid::Uuid;

const SESSION_ENDED_MESSAGE: &str = "Session has ended";

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    session_store: SessionStore,
    user_manager: UserManager,
    backends: Arc<Vec<Arc<dyn AuthenticationBackend>>>,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService, session_store: SessionStore) -> Self {
        let backends: Vec<Arc<dyn AuthenticationBackend>> =
            vec![Arc::new(PhoneBackend::new(pool.clone()))];
        Self::with_backends(pool, jwt_service, session_store, backends)
    }

    pub fn with_backends(
        pool: DatabaseConnection,
        jwt_service: JwtService,
        session_store: SessionStore,
        backends: Vec<Arc<dyn AuthenticationBackend>>,
    ) -> Self {
        let user_manager = UserManager::new(pool.clone());
        Self {
            pool,
            jwt_service,
            session_store,
            user_manager,
            backends: Arc::new(backends),
        }
    }

    /// Asks each backend in order; the first match wins.
    pub async fn authenticate(
        &self,
        phone_number: &str,
        password: &str,
    ) -> AppResult<Option<users::Model>> {
        for backend in self.backends.iter() {
            if let Some(user) = backend.authenticate(phone_number, password).await? {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    pub async fn login(&self, form: LoginForm) -> AppResult<AuthResponse> {
        let form = form.clean()?;

        let user = self
            .authenticate(&form.phone_number, &form.password)
            .await?
            .ok_or_else(|| AppError::AuthError(INVALID_LOGIN_MESSAGE.to_string()))?;
        LoginForm::confirm_login_allowed(&user)?;

        let user = self.record_login(user).await?;
        log::info!("User {user} logged in");
        self.start_session(user)
    }

    /// Creates the account and logs it in straight away.
    pub async fn register(&self, form: RegisterForm) -> AppResult<AuthResponse> {
        let form = form.clean()?;

        let user = self
            .user_manager
            .create_user(&form.phone_number, Some(&form.password), ExtraFields::default())
            .await?;

        let user = self.record_login(user).await?;
        log::info!("User {user} registered");
        self.start_session(user)
    }

    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user = self.resolve_session(&claims).await?;

        let auth_hash = session_auth_hash(&user.password);
        let subject = TokenSubject {
            user_id: user.id,
            phone_number: &user.phone_number,
            sid: &claims.sid,
            auth_hash: &auth_hash,
        };
        let tokens = TokenPair {
            access_token: self.jwt_service.generate_access_token(&subject)?,
            refresh_token: refresh_token.to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
        };

        Ok(AuthResponse {
            user: UserResponse::from(user),
            tokens,
            redirect_to: HOME_ROUTE.to_string(),
        })
    }

    /// Returns the live user behind a session. Fails when the session was ended,
    /// the user is gone or blocked, or the password changed since the session
    /// was bound.
    pub async fn resolve_session(&self, claims: &Claims) -> AppResult<users::Model> {
        if self.session_store.is_revoked(&claims.sid).await {
            return Err(AppError::AuthError(SESSION_ENDED_MESSAGE.to_string()));
        }

        let user = users::Entity::find_by_id(claims.user_id()?)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError(SESSION_ENDED_MESSAGE.to_string()))?;

        if !user.is_active {
            return Err(AppError::AuthError(SESSION_ENDED_MESSAGE.to_string()));
        }
        if session_auth_hash(&user.password) != claims.auth_hash {
            return Err(AppError::AuthError(SESSION_ENDED_MESSAGE.to_string()));
        }

        Ok(user)
    }

    /// Issues fresh tokens for the same session after the user's password changed,
    /// so the caller stays logged in while every other session is invalidated.
    pub fn rebind_session(&self, claims: &Claims, user: &users::Model) -> AppResult<TokenPair> {
        self.issue_tokens(user, &claims.sid)
    }

    pub async fn end_session(&self, claims: &Claims) {
        let until = Utc::now() + Duration::seconds(self.jwt_service.get_refresh_token_expires_in());
        self.session_store.revoke(&claims.sid, until).await;
        log::info!("Session {} of user {} ended", claims.sid, claims.sub);
    }

    fn start_session(&self, user: users::Model) -> AppResult<AuthResponse> {
        let sid = Uuid::new_v4().to_string();
        let tokens = self.issue_tokens(&user, &sid)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            tokens,
            redirect_to: HOME_ROUTE.to_string(),
        })
    }

    fn issue_tokens(&self, user: &users::Model, sid: &str) -> AppResult<TokenPair> {
        let auth_hash = session_auth_hash(&user.password);
        let subject = TokenSubject {
            user_id: user.id,
            phone_number: &user.phone_number,
            sid,
            auth_hash: &auth_hash,
        };
        Ok(TokenPair {
            access_token: self.jwt_service.generate_access_token(&subject)?,
            refresh_token: self.jwt_service.generate_refresh_token(&subject)?,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    async fn record_login(&self, user: users::Model) -> AppResult<users::Model> {
        let mut model = user.into_active_model();
        model.last_login = Set(Some(Utc::now()));
        Ok(model.update(&self.pool).await?)
    }
}
