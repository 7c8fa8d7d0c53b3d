//! SurrealDB implementation of [`ReferenceRepository`].
//!
//! These queries are the loaders behind the reference-data cache, so every
//! list is ordered by name.

use hekim_core::error::HekimResult;
use hekim_core::models::reference::{District, JobGroup, JobTitle, PolyclinicType, Province};
use hekim_core::repository::ReferenceRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::CountRow;
use crate::error::{DbError, parse_uuid};

#[derive(Debug, SurrealValue)]
struct NamedRow {
    record_id: String,
    name: String,
}

#[derive(Debug, SurrealValue)]
struct DistrictRow {
    record_id: String,
    province_id: String,
    name: String,
}

#[derive(Debug, SurrealValue)]
struct JobTitleRow {
    record_id: String,
    job_group_id: String,
    name: String,
    is_unique: bool,
}

#[derive(Debug, SurrealValue)]
struct PolyclinicTypeRow {
    record_id: String,
    name: String,
    description: String,
}

impl JobTitleRow {
    fn try_into_title(self) -> Result<JobTitle, DbError> {
        Ok(JobTitle {
            id: parse_uuid("job_title", &self.record_id)?,
            job_group_id: parse_uuid("job_group", &self.job_group_id)?,
            name: self.name,
            is_unique: self.is_unique,
        })
    }
}

impl PolyclinicTypeRow {
    fn try_into_type(self) -> Result<PolyclinicType, DbError> {
        Ok(PolyclinicType {
            id: parse_uuid("polyclinic_type", &self.record_id)?,
            name: self.name,
            description: self.description,
        })
    }
}

/// SurrealDB implementation of the reference catalog repository.
#[derive(Clone)]
pub struct SurrealReferenceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealReferenceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn named(&self, table: &'static str) -> Result<Vec<(Uuid, String)>, DbError> {
        let mut result = self
            .db
            .query(format!(
                "SELECT meta::id(id) AS record_id, name FROM {table} ORDER BY name ASC"
            ))
            .await?;
        let rows: Vec<NamedRow> = result.take(0)?;
        rows.into_iter()
            .map(|r| Ok((parse_uuid(table, &r.record_id)?, r.name)))
            .collect()
    }
}

impl<C: Connection> ReferenceRepository for SurrealReferenceRepository<C> {
    async fn provinces(&self) -> HekimResult<Vec<Province>> {
        let rows = self.named("province").await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Province { id, name })
            .collect())
    }

    async fn districts(&self, province_id: Uuid) -> HekimResult<Vec<District>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, province_id, name FROM district \
                 WHERE province_id = $province_id ORDER BY name ASC",
            )
            .bind(("province_id", province_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DistrictRow> = result.take(0).map_err(DbError::from)?;
        let districts = rows
            .into_iter()
            .map(|r| -> Result<District, DbError> {
                Ok(District {
                    id: parse_uuid("district", &r.record_id)?,
                    province_id: parse_uuid("province", &r.province_id)?,
                    name: r.name,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(districts)
    }

    async fn district_in_province(&self, district_id: Uuid, province_id: Uuid) -> HekimResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM type::record('district', $district_id) \
                 WHERE province_id = $province_id GROUP ALL",
            )
            .bind(("district_id", district_id.to_string()))
            .bind(("province_id", province_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(CountRow::total(rows) > 0)
    }

    async fn job_groups(&self) -> HekimResult<Vec<JobGroup>> {
        let rows = self.named("job_group").await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| JobGroup { id, name })
            .collect())
    }

    async fn job_titles(&self, job_group_id: Uuid) -> HekimResult<Vec<JobTitle>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, job_group_id, name, is_unique \
                 FROM job_title WHERE job_group_id = $job_group_id ORDER BY name ASC",
            )
            .bind(("job_group_id", job_group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<JobTitleRow> = result.take(0).map_err(DbError::from)?;
        let titles = rows
            .into_iter()
            .map(JobTitleRow::try_into_title)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(titles)
    }

    async fn get_job_title(&self, id: Uuid) -> HekimResult<Option<JobTitle>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, job_group_id, name, is_unique \
                 FROM type::record('job_title', $id)",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<JobTitleRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_title()?)),
            None => Ok(None),
        }
    }

    async fn polyclinic_types(&self) -> HekimResult<Vec<PolyclinicType>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, name, description \
                 FROM polyclinic_type ORDER BY name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PolyclinicTypeRow> = result.take(0).map_err(DbError::from)?;
        let types = rows
            .into_iter()
            .map(PolyclinicTypeRow::try_into_type)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(types)
    }

    async fn get_polyclinic_type(&self, id: Uuid) -> HekimResult<Option<PolyclinicType>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, name, description \
                 FROM type::record('polyclinic_type', $id)",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PolyclinicTypeRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_type()?)),
            None => Ok(None),
        }
    }
}
