//! Login and hospital sub-user management.

use hekim_auth::password;
use hekim_auth::service::{AuthService, LoginInput, LoginOutput};
use hekim_auth::token::TokenService;
use hekim_core::access::{
    AuthContext, PermissionLevel, Role, ensure_same_tenant, require_permission, require_role,
};
use hekim_core::error::{Denial, HekimError, HekimResult};
use hekim_core::models::user::{CreateSubUser, CreateUser, UpdateUser, User};
use hekim_core::repository::UserRepository;
use tracing::info;
use uuid::Uuid;

use crate::rules::{self, IdentityFields, UserIdentity};

pub struct AccountService<U: UserRepository> {
    users: U,
    auth: AuthService<U>,
    min_password_length: usize,
}

/// Sub-user management is reserved to admins holding the admin role.
fn require_admin(ctx: &AuthContext) -> HekimResult<()> {
    require_permission(ctx, PermissionLevel::Admin)?;
    require_role(ctx, Role::Admin)
}

impl<U: UserRepository + Clone> AccountService<U> {
    pub fn new(users: U, tokens: TokenService, min_password_length: usize) -> Self {
        Self {
            auth: AuthService::new(users.clone(), tokens),
            users,
            min_password_length,
        }
    }
}

impl<U: UserRepository> AccountService<U> {
    pub async fn login(&self, input: LoginInput) -> HekimResult<LoginOutput> {
        self.auth.login(input).await
    }

    pub async fn create_sub_user(&self, ctx: &AuthContext, input: CreateSubUser) -> HekimResult<User> {
        require_admin(ctx)?;

        let mut violations = rules::user_identity_violations(
            &self.users,
            UserIdentity {
                national_id: Some(&input.national_id),
                email: Some(&input.email),
                phone: Some(&input.phone),
            },
            &IdentityFields::USER,
            None,
        )
        .await?;
        violations.extend(rules::password_violation(
            "password",
            &input.password,
            self.min_password_length,
        ));
        violations.into_result()?;

        let password_hash = password::hash(input.password).await?;
        let user = self
            .users
            .create(
                ctx.hospital_id,
                CreateUser {
                    first_name: input.first_name,
                    last_name: input.last_name,
                    national_id: input.national_id,
                    email: input.email,
                    phone: input.phone,
                    password_hash,
                    role: input.role,
                    created_by: Some(ctx.user_id),
                },
            )
            .await?;

        info!(
            hospital_id = %ctx.hospital_id,
            user_id = %user.id,
            role = user.role.as_str(),
            "Sub-user created"
        );
        Ok(user)
    }

    /// Every account of the caller's hospital, the caller included.
    pub async fn list_sub_users(&self, ctx: &AuthContext) -> HekimResult<Vec<User>> {
        require_admin(ctx)?;
        self.users.list_by_hospital(ctx.hospital_id).await
    }

    /// An admin may edit its own details but cannot demote or deactivate itself.
    pub async fn update_sub_user(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        input: UpdateUser,
    ) -> HekimResult<User> {
        require_admin(ctx)?;
        let existing = self.users.get_by_id(id).await?;
        ensure_same_tenant(ctx, existing.hospital_id)?;
        if existing.id == ctx.user_id && demotes_or_deactivates(&input) {
            return Err(HekimError::Forbidden(Denial::SelfTarget));
        }

        rules::user_identity_violations(
            &self.users,
            UserIdentity {
                national_id: input.national_id.as_deref(),
                email: input.email.as_deref(),
                phone: input.phone.as_deref(),
            },
            &IdentityFields::USER,
            Some(id),
        )
        .await?
        .into_result()?;

        let user = self.users.update(id, input).await?;
        info!(hospital_id = %ctx.hospital_id, user_id = %id, "Sub-user updated");
        Ok(user)
    }

    /// Soft delete. An admin cannot remove its own account.
    pub async fn delete_sub_user(&self, ctx: &AuthContext, id: Uuid) -> HekimResult<()> {
        require_admin(ctx)?;
        let existing = self.users.get_by_id(id).await?;
        ensure_same_tenant(ctx, existing.hospital_id)?;
        if existing.id == ctx.user_id {
            return Err(HekimError::Forbidden(Denial::SelfTarget));
        }

        self.users.deactivate(id).await?;
        info!(hospital_id = %ctx.hospital_id, user_id = %id, "Sub-user deactivated");
        Ok(())
    }
}

/// An update that would take away the target's admin rights or its access.
fn demotes_or_deactivates(input: &UpdateUser) -> bool {
    matches!(input.role, Some(role) if role != Role::Admin) || input.is_active == Some(false)
}
