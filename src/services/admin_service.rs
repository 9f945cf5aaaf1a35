use crate::config::SiteConfig;
use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::forms::{AdminCreateUserForm, AdminUpdateUserForm, PHONE_TAKEN_MESSAGE};
use crate::models::*;
use crate::services::{ExtraFields, UserManager, UserService};
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

/// `LIKE` pattern matching `search` anywhere, with its wildcards taken literally.
fn contains_pattern(search: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

/// Staff-facing management of the user table.
#[derive(Clone)]
pub struct AdminService {
    pool: DatabaseConnection,
    site: SiteConfig,
    user_manager: UserManager,
    user_service: UserService,
}

impl AdminService {
    pub fn new(pool: DatabaseConnection, site: SiteConfig) -> Self {
        Self {
            user_manager: UserManager::new(pool.clone()),
            user_service: UserService::new(pool.clone()),
            pool,
            site,
        }
    }

    pub fn ensure_staff(user: &users::Model) -> AppResult<()> {
        if !user.is_active || !user.is_staff {
            return Err(AppError::PermissionDenied);
        }
        Ok(())
    }

    pub fn site(&self) -> AdminSiteResponse {
        AdminSiteResponse {
            site_header: self.site.admin_site_header.clone(),
            site_title: self.site.admin_site_title.clone(),
            index_title: self.site.admin_index_title.clone(),
        }
    }

    pub async fn list_users(&self, query: &AdminUserQuery) -> AppResult<PaginatedResponse<AdminUserRow>> {
        let mut select = users::Entity::find();
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(Expr::col((users::Entity, users::Column::PhoneNumber)).like(contains_pattern(search)));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(users::Column::IsActive.eq(is_active));
        }
        if let Some(is_staff) = query.is_staff {
            select = select.filter(users::Column::IsStaff.eq(is_staff));
        }
        if let Some(is_superuser) = query.is_superuser {
            select = select.filter(users::Column::IsSuperuser.eq(is_superuser));
        }
        if let Some(status) = query.status {
            select = select.filter(users::Column::Status.eq(status));
        }

        let params = PaginationParams::new(query.page, query.page_size);
        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_asc(users::Column::PhoneNumber)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(AdminUserRow::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<AdminUserDetail> {
        Ok(AdminUserDetail::from(self.user_service.get_user(user_id).await?))
    }

    pub async fn create_user(&self, form: AdminCreateUserForm) -> AppResult<AdminUserDetail> {
        let form = form.clean()?;
        let extra = ExtraFields {
            is_staff: Some(form.is_staff),
            is_superuser: Some(form.is_superuser),
            status: None,
        };
        let user = self
            .user_manager
            .create_user(&form.phone_number, Some(&form.password1), extra)
            .await?;
        Ok(AdminUserDetail::from(user))
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        form: AdminUpdateUserForm,
    ) -> AppResult<AdminUserDetail> {
        let form = form.clean()?;
        let status = form.resolved_status()?;
        let user = self.user_service.get_user(user_id).await?;

        if let Some(phone) = &form.phone_number {
            if *phone != user.phone_number
                && self.user_service.phone_taken_by_other(phone, user.id).await?
            {
                return Err(AppError::ValidationError(PHONE_TAKEN_MESSAGE.to_string()));
            }
        }

        let mut model = user.into_active_model();
        let mut changed = false;
        if let Some(phone) = form.phone_number {
            model.phone_number = Set(phone);
            changed = true;
        }
        if let Some(is_staff) = form.is_staff {
            model.is_staff = Set(is_staff);
            changed = true;
        }
        if let Some(is_superuser) = form.is_superuser {
            model.is_superuser = Set(is_superuser);
            changed = true;
        }
        if let Some(status) = status {
            model.status = Set(status);
            changed = true;
        }
        if !changed {
            return self.get_user(user_id).await;
        }

        let user = model
            .update(&self.pool)
            .await
            .map_err(|e| AppError::from_db_unique(e, PHONE_TAKEN_MESSAGE))?;
        log::info!("Admin updated user {user}");
        Ok(AdminUserDetail::from(user))
    }

    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        self.user_service.delete(user_id).await
    }
}
