//! Hospital (tenant) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub province_id: Uuid,
    pub district_id: Uuid,
    pub address_detail: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHospital {
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub province_id: Uuid,
    pub district_id: Uuid,
    pub address_detail: String,
}

/// Self-service registration: a hospital together with its first admin.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterHospital {
    pub hospital_name: String,
    pub tax_id: String,
    pub hospital_email: String,
    pub hospital_phone: String,
    pub province_id: Uuid,
    pub district_id: Uuid,
    pub address_detail: String,

    pub admin_first_name: String,
    pub admin_last_name: String,
    #[serde(rename = "admin_tc")]
    pub admin_national_id: String,
    pub admin_email: String,
    pub admin_phone: String,
    /// Raw password (hashed with Argon2id before storage).
    pub admin_password: String,
}

impl RegisterHospital {
    pub fn hospital(&self) -> CreateHospital {
        CreateHospital {
            name: self.hospital_name.clone(),
            tax_id: self.tax_id.clone(),
            email: self.hospital_email.clone(),
            phone: self.hospital_phone.clone(),
            province_id: self.province_id,
            district_id: self.district_id,
            address_detail: self.address_detail.clone(),
        }
    }
}
