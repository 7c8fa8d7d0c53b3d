//! Hospital staff (personnel) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub hospital_id: Uuid,
    /// `None` for staff not attached to a polyclinic (e.g. security).
    pub polyclinic_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "tc")]
    pub national_id: String,
    pub phone: String,
    pub job_group_id: Uuid,
    pub job_title_id: Uuid,
    /// ISO weekdays, 1 = Monday .. 7 = Sunday.
    pub work_days: Vec<u8>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaff {
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "tc")]
    pub national_id: String,
    pub phone: String,
    pub job_group_id: Uuid,
    pub job_title_id: Uuid,
    #[serde(default)]
    pub polyclinic_id: Option<Uuid>,
    pub work_days: Vec<u8>,
}

/// Full replacement of the mutable staff fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStaff {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub job_group_id: Uuid,
    pub job_title_id: Uuid,
    #[serde(default)]
    pub polyclinic_id: Option<Uuid>,
    pub work_days: Vec<u8>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Optional staff list filters. Text filters match case-insensitive
/// substrings; the rest match exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffFilter {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, rename = "tc")]
    pub national_id: Option<String>,
    #[serde(default)]
    pub job_group_id: Option<Uuid>,
    #[serde(default)]
    pub job_title_id: Option<Uuid>,
    #[serde(default)]
    pub polyclinic_id: Option<Uuid>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Listing row with the reference names resolved.
#[derive(Debug, Clone, Serialize)]
pub struct StaffSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "tc")]
    pub national_id: String,
    pub phone: String,
    pub job_group_name: String,
    pub job_title_name: String,
    pub polyclinic_type_name: Option<String>,
    pub work_days_text: String,
    pub is_active: bool,
}

/// Active staff of one job group attached to one polyclinic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffCount {
    pub polyclinic_id: Uuid,
    pub job_group_id: Uuid,
    pub total: u64,
}

const DAY_NAMES: [&str; 7] = [
    "Pazartesi",
    "Salı",
    "Çarşamba",
    "Perşembe",
    "Cuma",
    "Cumartesi",
    "Pazar",
];

/// Render work days as comma-separated Turkish day names, skipping
/// out-of-range values.
pub fn work_days_text(days: &[u8]) -> String {
    let names: Vec<&str> = days
        .iter()
        .filter(|d| (1..=7).contains(*d))
        .map(|d| DAY_NAMES[usize::from(*d) - 1])
        .collect();
    if names.is_empty() {
        return "Çalışma günü yok".into();
    }
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_days_render_in_given_order() {
        assert_eq!(work_days_text(&[1, 3, 5]), "Pazartesi, Çarşamba, Cuma");
        assert_eq!(work_days_text(&[7]), "Pazar");
    }

    #[test]
    fn empty_or_invalid_work_days() {
        assert_eq!(work_days_text(&[]), "Çalışma günü yok");
        assert_eq!(work_days_text(&[0, 8]), "Çalışma günü yok");
    }
}
