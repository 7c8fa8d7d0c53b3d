//! SurrealDB implementation of [`StaffRepository`].

use chrono::{DateTime, Utc};
use hekim_core::error::HekimResult;
use hekim_core::models::staff::{CreateStaff, Staff, StaffCount, StaffFilter, UpdateStaff};
use hekim_core::repository::{PaginatedResult, Pagination, StaffRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, exclude_clause};
use crate::error::{DbError, parse_opt_uuid, parse_uuid};

#[derive(Debug, SurrealValue)]
struct StaffRow {
    hospital_id: String,
    polyclinic_id: Option<String>,
    first_name: String,
    last_name: String,
    national_id: String,
    phone: String,
    job_group_id: String,
    job_title_id: String,
    work_days: Vec<i64>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct StaffRowWithId {
    record_id: String,
    hospital_id: String,
    polyclinic_id: Option<String>,
    first_name: String,
    last_name: String,
    national_id: String,
    phone: String,
    job_group_id: String,
    job_title_id: String,
    work_days: Vec<i64>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct StaffCountRow {
    polyclinic_id: String,
    job_group_id: String,
    total: u64,
}

fn days_from_db(days: Vec<i64>) -> Result<Vec<u8>, DbError> {
    days.into_iter()
        .map(|d| {
            u8::try_from(d).map_err(|_| DbError::InvalidRecord(format!("invalid work day: {d}")))
        })
        .collect()
}

fn days_to_db(days: &[u8]) -> Vec<i64> {
    days.iter().map(|d| i64::from(*d)).collect()
}

impl StaffRow {
    fn into_staff(self, id: Uuid) -> Result<Staff, DbError> {
        Ok(Staff {
            id,
            hospital_id: parse_uuid("hospital", &self.hospital_id)?,
            polyclinic_id: parse_opt_uuid("polyclinic", self.polyclinic_id.as_deref())?,
            first_name: self.first_name,
            last_name: self.last_name,
            national_id: self.national_id,
            phone: self.phone,
            job_group_id: parse_uuid("job_group", &self.job_group_id)?,
            job_title_id: parse_uuid("job_title", &self.job_title_id)?,
            work_days: days_from_db(self.work_days)?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl StaffRowWithId {
    fn try_into_staff(self) -> Result<Staff, DbError> {
        let id = parse_uuid("staff", &self.record_id)?;
        StaffRow {
            hospital_id: self.hospital_id,
            polyclinic_id: self.polyclinic_id,
            first_name: self.first_name,
            last_name: self.last_name,
            national_id: self.national_id,
            phone: self.phone,
            job_group_id: self.job_group_id,
            job_title_id: self.job_title_id,
            work_days: self.work_days,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_staff(id)
    }
}

/// Conditions for a filtered listing; every one binds a same-named parameter.
fn filter_conditions(filter: &StaffFilter) -> Vec<&'static str> {
    let mut conds = vec!["hospital_id = $hospital_id"];
    if filter.first_name.is_some() {
        conds.push("string::contains(string::lowercase(first_name), $first_name)");
    }
    if filter.last_name.is_some() {
        conds.push("string::contains(string::lowercase(last_name), $last_name)");
    }
    if filter.national_id.is_some() {
        conds.push("string::contains(national_id, $national_id)");
    }
    if filter.job_group_id.is_some() {
        conds.push("job_group_id = $job_group_id");
    }
    if filter.job_title_id.is_some() {
        conds.push("job_title_id = $job_title_id");
    }
    if filter.polyclinic_id.is_some() {
        conds.push("polyclinic_id = $polyclinic_id");
    }
    if filter.is_active.is_some() {
        conds.push("is_active = $is_active");
    }
    conds
}

/// SurrealDB implementation of the Staff repository.
#[derive(Clone)]
pub struct SurrealStaffRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealStaffRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn exists_by(
        &self,
        field: &'static str,
        value: &str,
        exclude: Option<Uuid>,
    ) -> HekimResult<bool> {
        let query = format!(
            "SELECT count() AS total FROM staff WHERE {field} = $value{} GROUP ALL",
            exclude_clause(exclude)
        );
        let mut builder = self.db.query(query).bind(("value", value.to_string()));
        if let Some(exclude) = exclude {
            builder = builder.bind(("exclude", exclude.to_string()));
        }
        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(CountRow::total(rows) > 0)
    }
}

impl<C: Connection> StaffRepository for SurrealStaffRepository<C> {
    async fn create(&self, hospital_id: Uuid, input: CreateStaff) -> HekimResult<Staff> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('staff', $id) SET \
                 hospital_id = $hospital_id, polyclinic_id = $polyclinic_id, \
                 first_name = $first_name, last_name = $last_name, \
                 national_id = $national_id, phone = $phone, \
                 job_group_id = $job_group_id, job_title_id = $job_title_id, \
                 work_days = $work_days, is_active = true",
            )
            .bind(("id", id.to_string()))
            .bind(("hospital_id", hospital_id.to_string()))
            .bind(("polyclinic_id", input.polyclinic_id.map(|u| u.to_string())))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("national_id", input.national_id))
            .bind(("phone", input.phone))
            .bind(("job_group_id", input.job_group_id.to_string()))
            .bind(("job_title_id", input.job_title_id.to_string()))
            .bind(("work_days", days_to_db(&input.work_days)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("staff", e))?;

        let rows: Vec<StaffRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("staff", id))?;

        Ok(row.into_staff(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HekimResult<Staff> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('staff', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StaffRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("staff", id))?;

        Ok(row.into_staff(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateStaff) -> HekimResult<Staff> {
        let result = self
            .db
            .query(
                "UPDATE type::record('staff', $id) SET \
                 polyclinic_id = $polyclinic_id, \
                 first_name = $first_name, last_name = $last_name, \
                 phone = $phone, job_group_id = $job_group_id, \
                 job_title_id = $job_title_id, work_days = $work_days, \
                 is_active = $is_active, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("polyclinic_id", input.polyclinic_id.map(|u| u.to_string())))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("phone", input.phone))
            .bind(("job_group_id", input.job_group_id.to_string()))
            .bind(("job_title_id", input.job_title_id.to_string()))
            .bind(("work_days", days_to_db(&input.work_days)))
            .bind(("is_active", input.is_active))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("staff", e))?;

        let rows: Vec<StaffRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("staff", id))?;

        Ok(row.into_staff(id)?)
    }

    async fn deactivate(&self, id: Uuid) -> HekimResult<()> {
        let mut result = self
            .db
            .query(
                "UPDATE type::record('staff', $id) SET \
                 is_active = false, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StaffRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("staff", id).into());
        }
        Ok(())
    }

    async fn exists_by_national_id(
        &self,
        national_id: &str,
        exclude: Option<Uuid>,
    ) -> HekimResult<bool> {
        self.exists_by("national_id", national_id, exclude).await
    }

    async fn exists_by_phone(&self, phone: &str, exclude: Option<Uuid>) -> HekimResult<bool> {
        self.exists_by("phone", phone, exclude).await
    }

    async fn count_active_with_job_title(
        &self,
        hospital_id: Uuid,
        job_title_id: Uuid,
        exclude: Option<Uuid>,
    ) -> HekimResult<u64> {
        let query = format!(
            "SELECT count() AS total FROM staff \
             WHERE hospital_id = $hospital_id AND job_title_id = $job_title_id \
             AND is_active = true{} GROUP ALL",
            exclude_clause(exclude)
        );
        let mut builder = self
            .db
            .query(query)
            .bind(("hospital_id", hospital_id.to_string()))
            .bind(("job_title_id", job_title_id.to_string()));
        if let Some(exclude) = exclude {
            builder = builder.bind(("exclude", exclude.to_string()));
        }
        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(CountRow::total(rows))
    }

    async fn list(
        &self,
        hospital_id: Uuid,
        filter: &StaffFilter,
        pagination: Pagination,
    ) -> HekimResult<PaginatedResult<Staff>> {
        let where_clause = filter_conditions(filter).join(" AND ");

        let query = format!(
            "SELECT count() AS total FROM staff WHERE {where_clause} GROUP ALL; \
             SELECT meta::id(id) AS record_id, * FROM staff WHERE {where_clause} \
             ORDER BY first_name ASC, last_name ASC LIMIT $limit START $start"
        );

        let mut builder = self
            .db
            .query(query)
            .bind(("hospital_id", hospital_id.to_string()))
            .bind(("limit", pagination.page_size))
            .bind(("start", pagination.offset()));
        if let Some(first_name) = &filter.first_name {
            builder = builder.bind(("first_name", first_name.to_lowercase()));
        }
        if let Some(last_name) = &filter.last_name {
            builder = builder.bind(("last_name", last_name.to_lowercase()));
        }
        if let Some(national_id) = &filter.national_id {
            builder = builder.bind(("national_id", national_id.clone()));
        }
        if let Some(job_group_id) = filter.job_group_id {
            builder = builder.bind(("job_group_id", job_group_id.to_string()));
        }
        if let Some(job_title_id) = filter.job_title_id {
            builder = builder.bind(("job_title_id", job_title_id.to_string()));
        }
        if let Some(polyclinic_id) = filter.polyclinic_id {
            builder = builder.bind(("polyclinic_id", polyclinic_id.to_string()));
        }
        if let Some(is_active) = filter.is_active {
            builder = builder.bind(("is_active", is_active));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = CountRow::total(count_rows);

        let rows: Vec<StaffRowWithId> = result.take(1).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|r| r.try_into_staff())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult {
            items,
            total,
            pagination,
        })
    }

    async fn count_active_by_polyclinic(&self, hospital_id: Uuid) -> HekimResult<Vec<StaffCount>> {
        let mut result = self
            .db
            .query(
                "SELECT polyclinic_id, job_group_id, count() AS total FROM staff \
                 WHERE hospital_id = $hospital_id AND is_active = true \
                 AND polyclinic_id != NONE \
                 GROUP BY polyclinic_id, job_group_id",
            )
            .bind(("hospital_id", hospital_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StaffCountRow> = result.take(0).map_err(DbError::from)?;
        let counts = rows
            .into_iter()
            .map(|r| -> Result<StaffCount, DbError> {
                Ok(StaffCount {
                    polyclinic_id: parse_uuid("polyclinic", &r.polyclinic_id)?,
                    job_group_id: parse_uuid("job_group", &r.job_group_id)?,
                    total: r.total,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }
}
