//! Hospital polyclinic domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A polyclinic type opened at a hospital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalPolyclinic {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub polyclinic_type_id: Uuid,
    pub floor: i32,
    pub room_number: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePolyclinic {
    pub polyclinic_type_id: Uuid,
    pub floor: i32,
    pub room_number: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePolyclinic {
    pub floor: i32,
    pub room_number: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffCountByGroup {
    pub job_group_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolyclinicSummary {
    pub id: Uuid,
    pub polyclinic_type_name: String,
    pub floor: i32,
    pub room_number: i32,
    pub is_active: bool,
    pub total_staff_count: u64,
    pub staff_by_job_group: Vec<StaffCountByGroup>,
}
