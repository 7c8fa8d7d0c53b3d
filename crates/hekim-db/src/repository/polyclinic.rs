//! SurrealDB implementation of [`PolyclinicRepository`].

use chrono::{DateTime, Utc};
use hekim_core::error::HekimResult;
use hekim_core::models::polyclinic::{CreatePolyclinic, HospitalPolyclinic, UpdatePolyclinic};
use hekim_core::repository::PolyclinicRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, exclude_clause};
use crate::error::{DbError, parse_uuid};

#[derive(Debug, SurrealValue)]
struct PolyclinicRow {
    hospital_id: String,
    polyclinic_type_id: String,
    floor: i64,
    room_number: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PolyclinicRowWithId {
    record_id: String,
    hospital_id: String,
    polyclinic_type_id: String,
    floor: i64,
    room_number: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn to_i32(field: &str, value: i64) -> Result<i32, DbError> {
    i32::try_from(value).map_err(|_| DbError::InvalidRecord(format!("{field} out of range: {value}")))
}

impl PolyclinicRow {
    fn into_polyclinic(self, id: Uuid) -> Result<HospitalPolyclinic, DbError> {
        Ok(HospitalPolyclinic {
            id,
            hospital_id: parse_uuid("hospital", &self.hospital_id)?,
            polyclinic_type_id: parse_uuid("polyclinic_type", &self.polyclinic_type_id)?,
            floor: to_i32("floor", self.floor)?,
            room_number: to_i32("room_number", self.room_number)?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PolyclinicRowWithId {
    fn try_into_polyclinic(self) -> Result<HospitalPolyclinic, DbError> {
        Ok(HospitalPolyclinic {
            id: parse_uuid("hospital_polyclinic", &self.record_id)?,
            hospital_id: parse_uuid("hospital", &self.hospital_id)?,
            polyclinic_type_id: parse_uuid("polyclinic_type", &self.polyclinic_type_id)?,
            floor: to_i32("floor", self.floor)?,
            room_number: to_i32("room_number", self.room_number)?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the hospital polyclinic repository.
#[derive(Clone)]
pub struct SurrealPolyclinicRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPolyclinicRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PolyclinicRepository for SurrealPolyclinicRepository<C> {
    async fn create(
        &self,
        hospital_id: Uuid,
        input: CreatePolyclinic,
    ) -> HekimResult<HospitalPolyclinic> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('hospital_polyclinic', $id) SET \
                 hospital_id = $hospital_id, \
                 polyclinic_type_id = $polyclinic_type_id, \
                 floor = $floor, room_number = $room_number, is_active = true",
            )
            .bind(("id", id.to_string()))
            .bind(("hospital_id", hospital_id.to_string()))
            .bind(("polyclinic_type_id", input.polyclinic_type_id.to_string()))
            .bind(("floor", i64::from(input.floor)))
            .bind(("room_number", i64::from(input.room_number)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("hospital_polyclinic", e))?;

        let rows: Vec<PolyclinicRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("hospital_polyclinic", id))?;

        Ok(row.into_polyclinic(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HekimResult<HospitalPolyclinic> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('hospital_polyclinic', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PolyclinicRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("hospital_polyclinic", id))?;

        Ok(row.into_polyclinic(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdatePolyclinic) -> HekimResult<HospitalPolyclinic> {
        let result = self
            .db
            .query(
                "UPDATE type::record('hospital_polyclinic', $id) SET \
                 floor = $floor, room_number = $room_number, \
                 is_active = $is_active, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("floor", i64::from(input.floor)))
            .bind(("room_number", i64::from(input.room_number)))
            .bind(("is_active", input.is_active))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("hospital_polyclinic", e))?;

        let rows: Vec<PolyclinicRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("hospital_polyclinic", id))?;

        Ok(row.into_polyclinic(id)?)
    }

    async fn deactivate(&self, id: Uuid) -> HekimResult<()> {
        let mut result = self
            .db
            .query(
                "UPDATE type::record('hospital_polyclinic', $id) SET \
                 is_active = false, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PolyclinicRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("hospital_polyclinic", id).into());
        }
        Ok(())
    }

    async fn active_type_exists(
        &self,
        hospital_id: Uuid,
        polyclinic_type_id: Uuid,
        exclude: Option<Uuid>,
    ) -> HekimResult<bool> {
        let query = format!(
            "SELECT count() AS total FROM hospital_polyclinic \
             WHERE hospital_id = $hospital_id \
             AND polyclinic_type_id = $polyclinic_type_id \
             AND is_active = true{} GROUP ALL",
            exclude_clause(exclude)
        );
        let mut builder = self
            .db
            .query(query)
            .bind(("hospital_id", hospital_id.to_string()))
            .bind(("polyclinic_type_id", polyclinic_type_id.to_string()));
        if let Some(exclude) = exclude {
            builder = builder.bind(("exclude", exclude.to_string()));
        }
        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(CountRow::total(rows) > 0)
    }

    async fn list_by_hospital(
        &self,
        hospital_id: Uuid,
        active_only: bool,
    ) -> HekimResult<Vec<HospitalPolyclinic>> {
        let query = if active_only {
            "SELECT meta::id(id) AS record_id, * FROM hospital_polyclinic \
             WHERE hospital_id = $hospital_id AND is_active = true"
        } else {
            "SELECT meta::id(id) AS record_id, * FROM hospital_polyclinic \
             WHERE hospital_id = $hospital_id"
        };
        let mut result = self
            .db
            .query(query)
            .bind(("hospital_id", hospital_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PolyclinicRowWithId> = result.take(0).map_err(DbError::from)?;
        let polyclinics = rows
            .into_iter()
            .map(|r| r.try_into_polyclinic())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(polyclinics)
    }
}
