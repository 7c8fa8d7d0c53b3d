//! Schema definitions and migration runner for SurrealDB.
//!
//! Tables are SCHEMAFULL. UUIDs, including foreign keys, are stored as
//! strings; the role enum is stored by its wire name under an ASSERT.
//! Every globally unique identity field carries a UNIQUE index, which is
//! the final word on uniqueness when concurrent writers race.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "tenant_lookup_indexes",
        sql: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1: initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Hospitals (tenants, global scope)
-- =======================================================================
DEFINE TABLE hospital SCHEMAFULL;
DEFINE FIELD name ON TABLE hospital TYPE string;
DEFINE FIELD tax_id ON TABLE hospital TYPE string;
DEFINE FIELD email ON TABLE hospital TYPE string;
DEFINE FIELD phone ON TABLE hospital TYPE string;
DEFINE FIELD province_id ON TABLE hospital TYPE string;
DEFINE FIELD district_id ON TABLE hospital TYPE string;
DEFINE FIELD address_detail ON TABLE hospital TYPE string;
DEFINE FIELD created_at ON TABLE hospital TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE hospital TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_hospital_tax_id ON TABLE hospital \
    COLUMNS tax_id UNIQUE;
DEFINE INDEX idx_hospital_email ON TABLE hospital \
    COLUMNS email UNIQUE;
DEFINE INDEX idx_hospital_phone ON TABLE hospital \
    COLUMNS phone UNIQUE;

-- =======================================================================
-- Users (hospital scope, globally unique identity fields)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD hospital_id ON TABLE user TYPE string;
DEFINE FIELD first_name ON TABLE user TYPE string;
DEFINE FIELD last_name ON TABLE user TYPE string;
DEFINE FIELD national_id ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD phone ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['yetkili', 'çalışan'];
DEFINE FIELD created_by ON TABLE user TYPE option<string>;
DEFINE FIELD is_active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_national_id ON TABLE user \
    COLUMNS national_id UNIQUE;
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_phone ON TABLE user COLUMNS phone UNIQUE;
DEFINE INDEX idx_user_hospital ON TABLE user COLUMNS hospital_id;

-- =======================================================================
-- Staff (hospital scope, globally unique identity fields)
-- =======================================================================
DEFINE TABLE staff SCHEMAFULL;
DEFINE FIELD hospital_id ON TABLE staff TYPE string;
DEFINE FIELD polyclinic_id ON TABLE staff TYPE option<string>;
DEFINE FIELD first_name ON TABLE staff TYPE string;
DEFINE FIELD last_name ON TABLE staff TYPE string;
DEFINE FIELD national_id ON TABLE staff TYPE string;
DEFINE FIELD phone ON TABLE staff TYPE string;
DEFINE FIELD job_group_id ON TABLE staff TYPE string;
DEFINE FIELD job_title_id ON TABLE staff TYPE string;
DEFINE FIELD work_days ON TABLE staff TYPE array<int>;
DEFINE FIELD is_active ON TABLE staff TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE staff TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE staff TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_staff_national_id ON TABLE staff \
    COLUMNS national_id UNIQUE;
DEFINE INDEX idx_staff_phone ON TABLE staff COLUMNS phone UNIQUE;
DEFINE INDEX idx_staff_hospital ON TABLE staff COLUMNS hospital_id;

-- =======================================================================
-- Hospital polyclinics (hospital scope)
-- =======================================================================
DEFINE TABLE hospital_polyclinic SCHEMAFULL;
DEFINE FIELD hospital_id ON TABLE hospital_polyclinic TYPE string;
DEFINE FIELD polyclinic_type_id ON TABLE hospital_polyclinic \
    TYPE string;
DEFINE FIELD floor ON TABLE hospital_polyclinic TYPE int;
DEFINE FIELD room_number ON TABLE hospital_polyclinic TYPE int;
DEFINE FIELD is_active ON TABLE hospital_polyclinic TYPE bool \
    DEFAULT true;
DEFINE FIELD created_at ON TABLE hospital_polyclinic TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE hospital_polyclinic TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_hospital_polyclinic_hospital \
    ON TABLE hospital_polyclinic COLUMNS hospital_id;

-- =======================================================================
-- Reference catalogs (global scope)
-- =======================================================================
DEFINE TABLE province SCHEMAFULL;
DEFINE FIELD name ON TABLE province TYPE string;
DEFINE INDEX idx_province_name ON TABLE province COLUMNS name UNIQUE;

DEFINE TABLE district SCHEMAFULL;
DEFINE FIELD province_id ON TABLE district TYPE string;
DEFINE FIELD name ON TABLE district TYPE string;
DEFINE INDEX idx_district_province_name ON TABLE district \
    COLUMNS province_id, name UNIQUE;

DEFINE TABLE job_group SCHEMAFULL;
DEFINE FIELD name ON TABLE job_group TYPE string;
DEFINE INDEX idx_job_group_name ON TABLE job_group COLUMNS name UNIQUE;

DEFINE TABLE job_title SCHEMAFULL;
DEFINE FIELD job_group_id ON TABLE job_title TYPE string;
DEFINE FIELD name ON TABLE job_title TYPE string;
DEFINE FIELD is_unique ON TABLE job_title TYPE bool DEFAULT false;
DEFINE INDEX idx_job_title_group_name ON TABLE job_title \
    COLUMNS job_group_id, name UNIQUE;

DEFINE TABLE polyclinic_type SCHEMAFULL;
DEFINE FIELD name ON TABLE polyclinic_type TYPE string;
DEFINE FIELD description ON TABLE polyclinic_type TYPE string \
    DEFAULT '';
DEFINE INDEX idx_polyclinic_type_name ON TABLE polyclinic_type \
    COLUMNS name UNIQUE;
";

// -----------------------------------------------------------------------
// Schema v2: composite indexes for the per-hospital rule checks
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
DEFINE INDEX IF NOT EXISTS idx_staff_hospital_title ON TABLE staff \
    COLUMNS hospital_id, job_title_id;
DEFINE INDEX IF NOT EXISTS idx_hospital_polyclinic_type \
    ON TABLE hospital_polyclinic COLUMNS hospital_id, polyclinic_type_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Bring the schema up to date, returning how many migrations ran.
///
/// The `_migration` table records every applied version; only versions
/// above the recorded maximum are applied, in order.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<usize, DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
        .collect();
    if pending.is_empty() {
        info!(version = current_version, "Schema up to date");
        return Ok(0);
    }

    for migration in &pending {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "v{} '{}': {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!("recording v{}: {}", migration.version, e))
            })?;
    }

    Ok(pending.len())
}

/// Raw DDL of the initial schema.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
