//! SurrealDB implementation of [`HospitalRepository`].

use chrono::{DateTime, Utc};
use hekim_core::error::HekimResult;
use hekim_core::models::hospital::{CreateHospital, Hospital};
use hekim_core::models::user::{CreateUser, User};
use hekim_core::repository::{HospitalRepository, UserRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::{CountRow, SurrealUserRepository};
use crate::error::{DbError, parse_uuid};

#[derive(Debug, SurrealValue)]
struct HospitalRow {
    name: String,
    tax_id: String,
    email: String,
    phone: String,
    province_id: String,
    district_id: String,
    address_detail: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl HospitalRow {
    fn into_hospital(self, id: Uuid) -> Result<Hospital, DbError> {
        Ok(Hospital {
            id,
            name: self.name,
            tax_id: self.tax_id,
            email: self.email,
            phone: self.phone,
            province_id: parse_uuid("province", &self.province_id)?,
            district_id: parse_uuid("district", &self.district_id)?,
            address_detail: self.address_detail,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Hospital repository.
#[derive(Clone)]
pub struct SurrealHospitalRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealHospitalRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn exists_by(&self, field: &'static str, value: &str) -> HekimResult<bool> {
        let mut result = self
            .db
            .query(format!(
                "SELECT count() AS total FROM hospital WHERE {field} = $value GROUP ALL"
            ))
            .bind(("value", value.to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(CountRow::total(rows) > 0)
    }
}

impl<C: Connection> HospitalRepository for SurrealHospitalRepository<C> {
    async fn create_with_admin(
        &self,
        hospital: CreateHospital,
        admin: CreateUser,
    ) -> HekimResult<(Hospital, User)> {
        let hospital_id = Uuid::new_v4();
        let admin_id = Uuid::new_v4();

        let mut response = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::record('hospital', $hospital_id) SET \
                 name = $name, tax_id = $tax_id, email = $email, phone = $phone, \
                 province_id = $province_id, district_id = $district_id, \
                 address_detail = $address_detail; \
                 CREATE type::record('user', $admin_id) SET \
                 hospital_id = $hospital_id, \
                 first_name = $first_name, last_name = $last_name, \
                 national_id = $national_id, email = $admin_email, \
                 phone = $admin_phone, password_hash = $password_hash, \
                 role = $role, created_by = NONE, is_active = true; \
                 COMMIT TRANSACTION;",
            )
            .bind(("hospital_id", hospital_id.to_string()))
            .bind(("name", hospital.name))
            .bind(("tax_id", hospital.tax_id))
            .bind(("email", hospital.email))
            .bind(("phone", hospital.phone))
            .bind(("province_id", hospital.province_id.to_string()))
            .bind(("district_id", hospital.district_id.to_string()))
            .bind(("address_detail", hospital.address_detail))
            .bind(("admin_id", admin_id.to_string()))
            .bind(("first_name", admin.first_name))
            .bind(("last_name", admin.last_name))
            .bind(("national_id", admin.national_id))
            .bind(("admin_email", admin.email))
            .bind(("admin_phone", admin.phone))
            .bind(("password_hash", admin.password_hash))
            .bind(("role", admin.role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        // A failed transaction reports an error for every statement; the
        // unique index violation, if any, is among them.
        let errors = response.take_errors();
        if !errors.is_empty() {
            let mut fallback = None;
            for (_, err) in errors {
                let message = err.to_string();
                let entity = if message.contains("idx_user_") {
                    "user"
                } else {
                    "hospital"
                };
                match DbError::from_statement(entity, message) {
                    violation @ DbError::UniqueViolation { .. } => {
                        debug!(%hospital_id, "Registration rejected by unique index");
                        return Err(violation.into());
                    }
                    other => {
                        fallback.get_or_insert(other);
                    }
                }
            }
            if let Some(err) = fallback {
                return Err(err.into());
            }
        }

        let hospital = self.get_by_id(hospital_id).await?;
        let admin = SurrealUserRepository::new(self.db.clone())
            .get_by_id(admin_id)
            .await?;
        Ok((hospital, admin))
    }

    async fn get_by_id(&self, id: Uuid) -> HekimResult<Hospital> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('hospital', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<HospitalRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("hospital", id))?;

        Ok(row.into_hospital(id)?)
    }

    async fn exists_by_tax_id(&self, tax_id: &str) -> HekimResult<bool> {
        self.exists_by("tax_id", tax_id).await
    }

    async fn exists_by_email(&self, email: &str) -> HekimResult<bool> {
        self.exists_by("email", email).await
    }

    async fn exists_by_phone(&self, phone: &str) -> HekimResult<bool> {
        self.exists_by("phone", phone).await
    }
}
