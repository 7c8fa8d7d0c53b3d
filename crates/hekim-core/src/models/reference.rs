//! Reference ("master") data: locations, job taxonomy and polyclinic types.
//!
//! Seeded once and read-mostly; these are the payloads held in the
//! reference-data cache.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: Uuid,
    pub province_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobGroup {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTitle {
    pub id: Uuid,
    pub job_group_id: Uuid,
    pub name: String,
    /// At most one active staff member per hospital may hold this title.
    pub is_unique: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolyclinicType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}
