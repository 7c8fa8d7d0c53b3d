//! Hospital registration and lookup.

use hekim_auth::password;
use hekim_auth::token::TokenService;
use hekim_core::access::Role;
use hekim_core::error::HekimResult;
use hekim_core::models::hospital::{Hospital, RegisterHospital};
use hekim_core::models::user::{CreateUser, User};
use hekim_core::repository::{HospitalRepository, ReferenceRepository, UserRepository};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::rules;

/// A newly registered hospital with its first admin, already logged in.
#[derive(Debug, Serialize)]
pub struct Registration {
    pub hospital: Hospital,
    pub admin: User,
    pub token: String,
    pub expires_in: u64,
}

pub struct HospitalService<H, U, R>
where
    H: HospitalRepository,
    U: UserRepository,
    R: ReferenceRepository,
{
    hospitals: H,
    users: U,
    refs: R,
    tokens: TokenService,
    min_password_length: usize,
}

impl<H, U, R> HospitalService<H, U, R>
where
    H: HospitalRepository,
    U: UserRepository,
    R: ReferenceRepository,
{
    pub fn new(
        hospitals: H,
        users: U,
        refs: R,
        tokens: TokenService,
        min_password_length: usize,
    ) -> Self {
        Self {
            hospitals,
            users,
            refs,
            tokens,
            min_password_length,
        }
    }

    /// Create a hospital together with its admin account.
    ///
    /// Both rows are written in one transaction; the returned token is
    /// scoped to the new hospital with the admin role.
    pub async fn register(&self, input: RegisterHospital) -> HekimResult<Registration> {
        let violations = rules::registration_violations(
            &self.hospitals,
            &self.users,
            &self.refs,
            &input,
            self.min_password_length,
        )
        .await?;
        if !violations.is_empty() {
            warn!(
                tax_id = %input.tax_id,
                violations = violations.len(),
                "Hospital registration rejected"
            );
        }
        violations.into_result()?;

        let password_hash = password::hash(input.admin_password.clone()).await?;
        let admin = CreateUser {
            first_name: input.admin_first_name.clone(),
            last_name: input.admin_last_name.clone(),
            national_id: input.admin_national_id.clone(),
            email: input.admin_email.clone(),
            phone: input.admin_phone.clone(),
            password_hash,
            role: Role::Admin,
            created_by: None,
        };
        let (hospital, admin) = self
            .hospitals
            .create_with_admin(input.hospital(), admin)
            .await?;

        let issued = self
            .tokens
            .issue(admin.id, hospital.id, admin.role, &admin.email)?;
        info!(hospital_id = %hospital.id, admin_id = %admin.id, "Hospital registered");

        Ok(Registration {
            hospital,
            admin,
            token: issued.token,
            expires_in: issued.expires_in,
        })
    }

    pub async fn get(&self, id: Uuid) -> HekimResult<Hospital> {
        self.hospitals.get_by_id(id).await
    }
}
