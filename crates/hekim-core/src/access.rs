//! Roles, permission levels and the per-request access context.
//!
//! Permission is never stored per user: it is derived from the role carried
//! in the session token, so checking access needs no lookup.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Denial, HekimError, HekimResult};

/// The role of a hospital user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full read/write within the hospital ("yetkili").
    #[serde(rename = "yetkili")]
    Admin,
    /// Read-only within the hospital ("çalışan").
    #[serde(rename = "çalışan")]
    Worker,
}

impl Role {
    /// Wire and storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "yetkili",
            Role::Worker => "çalışan",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yetkili" => Some(Role::Admin),
            "çalışan" => Some(Role::Worker),
            _ => None,
        }
    }

    pub fn permission_level(&self) -> PermissionLevel {
        match self {
            Role::Admin => PermissionLevel::Admin,
            Role::Worker => PermissionLevel::Read,
        }
    }
}

/// Ordered capability tier.
///
/// `Write` sits between the two assigned tiers; no role maps to it yet, so
/// an endpoint requiring `Write` is reachable by admins only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PermissionLevel {
    Read,
    Write,
    Admin,
}

impl PermissionLevel {
    /// Name reported in 403 responses.
    pub fn name(&self) -> &'static str {
        match self {
            PermissionLevel::Read => "okuma",
            PermissionLevel::Write => "yazma",
            PermissionLevel::Admin => "yönetici",
        }
    }
}

/// Verified identity of the caller, attached to every protected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub hospital_id: Uuid,
    pub role: Role,
    pub username: String,
}

impl AuthContext {
    pub fn permission_level(&self) -> PermissionLevel {
        self.role.permission_level()
    }
}

/// Reject the caller unless its derived level is at least `required`.
pub fn require_permission(ctx: &AuthContext, required: PermissionLevel) -> HekimResult<()> {
    let current = ctx.permission_level();
    if current < required {
        return Err(HekimError::Forbidden(Denial::InsufficientPermission {
            required,
            current,
        }));
    }
    Ok(())
}

/// Reject the caller unless it holds exactly `required`.
pub fn require_role(ctx: &AuthContext, required: Role) -> HekimResult<()> {
    if ctx.role != required {
        return Err(HekimError::Forbidden(Denial::RoleRequired {
            required,
            current: ctx.role,
        }));
    }
    Ok(())
}

/// Reject access to a row owned by another hospital.
///
/// Called after the row is loaded; an absent row is reported as `NotFound`
/// by the caller before this check runs.
pub fn ensure_same_tenant(ctx: &AuthContext, row_hospital_id: Uuid) -> HekimResult<()> {
    if ctx.hospital_id != row_hospital_id {
        return Err(HekimError::Forbidden(Denial::CrossTenant));
    }
    Ok(())
}
