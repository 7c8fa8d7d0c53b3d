//! Reference catalog bootstrap.
//!
//! A [`ReferenceSeed`] describes provinces (with their districts), job
//! groups (with their titles) and polyclinic types. It is applied once, to a
//! database whose catalogs are still empty; later runs leave existing data
//! untouched.

use std::path::Path;

use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::CountRow;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceSeed {
    #[serde(default)]
    pub provinces: Vec<ProvinceSeed>,
    #[serde(default)]
    pub job_groups: Vec<JobGroupSeed>,
    #[serde(default)]
    pub polyclinic_types: Vec<PolyclinicTypeSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvinceSeed {
    pub name: String,
    #[serde(default)]
    pub districts: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobGroupSeed {
    pub name: String,
    #[serde(default)]
    pub titles: Vec<JobTitleSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobTitleSeed {
    pub name: String,
    #[serde(default)]
    pub is_unique: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolyclinicTypeSeed {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ReferenceSeed {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DbError::Migration(format!("reading seed {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| DbError::Migration(format!("parsing seed {}: {e}", path.display())))
    }

    /// Insert the catalogs if none of them hold any rows yet.
    ///
    /// Returns `false` when the database was already seeded.
    pub async fn apply<C: Connection>(&self, db: &Surreal<C>) -> Result<bool, DbError> {
        let mut result = db
            .query(
                "SELECT count() AS total FROM province GROUP ALL; \
                 SELECT count() AS total FROM job_group GROUP ALL; \
                 SELECT count() AS total FROM polyclinic_type GROUP ALL",
            )
            .await?;
        let mut existing = 0;
        for idx in 0..3 {
            let rows: Vec<CountRow> = result.take(idx)?;
            existing += CountRow::total(rows);
        }
        if existing > 0 {
            info!(rows = existing, "Reference catalogs already present, skipping seed");
            return Ok(false);
        }

        for province in &self.provinces {
            let province_id = insert(
                db,
                "CREATE type::record('province', $id) SET name = $name",
                vec![("name", province.name.clone())],
                "province",
            )
            .await?;
            for district in &province.districts {
                insert(
                    db,
                    "CREATE type::record('district', $id) SET \
                     province_id = $parent, name = $name",
                    vec![("parent", province_id.clone()), ("name", district.clone())],
                    "district",
                )
                .await?;
            }
        }

        for group in &self.job_groups {
            let group_id = insert(
                db,
                "CREATE type::record('job_group', $id) SET name = $name",
                vec![("name", group.name.clone())],
                "job_group",
            )
            .await?;
            for title in &group.titles {
                let id = Uuid::new_v4().to_string();
                db.query(
                    "CREATE type::record('job_title', $id) SET \
                     job_group_id = $parent, name = $name, is_unique = $is_unique",
                )
                .bind(("id", id))
                .bind(("parent", group_id.clone()))
                .bind(("name", title.name.clone()))
                .bind(("is_unique", title.is_unique))
                .await?
                .check()
                .map_err(|e| DbError::from_statement("job_title", e))?;
            }
        }

        for kind in &self.polyclinic_types {
            insert(
                db,
                "CREATE type::record('polyclinic_type', $id) SET \
                 name = $name, description = $description",
                vec![
                    ("name", kind.name.clone()),
                    ("description", kind.description.clone()),
                ],
                "polyclinic_type",
            )
            .await?;
        }

        info!(
            provinces = self.provinces.len(),
            job_groups = self.job_groups.len(),
            polyclinic_types = self.polyclinic_types.len(),
            "Reference catalogs seeded"
        );
        Ok(true)
    }
}

/// Create one catalog row with a fresh id and string-valued fields.
async fn insert<C: Connection>(
    db: &Surreal<C>,
    sql: &str,
    fields: Vec<(&'static str, String)>,
    entity: &str,
) -> Result<String, DbError> {
    let id = Uuid::new_v4().to_string();
    let mut query = db.query(sql).bind(("id", id.clone()));
    for field in fields {
        query = query.bind(field);
    }
    query
        .await?
        .check()
        .map_err(|e| DbError::from_statement(entity, e))?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_json_defaults_missing_sections() {
        let seed: ReferenceSeed = serde_json::from_str(
            r#"{"job_groups":[{"name":"Doktor","titles":[{"name":"Başhekim","is_unique":true}]}]}"#,
        )
        .unwrap();
        assert!(seed.provinces.is_empty());
        assert!(seed.polyclinic_types.is_empty());
        assert!(seed.job_groups[0].titles[0].is_unique);
    }
}
