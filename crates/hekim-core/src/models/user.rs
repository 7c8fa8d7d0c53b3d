//! Hospital user domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "tc")]
    pub national_id: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    /// The admin that created this account; `None` for the registering admin.
    pub created_by: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store-level insert. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: Role,
    pub created_by: Option<Uuid>,
}

/// Sub-user creation request submitted by a hospital admin.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubUser {
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "tc")]
    pub national_id: String,
    pub email: String,
    pub phone: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    #[serde(default = "default_sub_user_role")]
    pub role: Role,
}

fn default_sub_user_role() -> Role {
    Role::Worker
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(rename = "tc")]
    pub national_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}
