//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups by id are global: the
//! caller loads the row first and then checks its `hospital_id` against the
//! acting user, so a missing row and a foreign row stay distinguishable.
//! Listing operations take a `hospital_id` and never cross tenants.

use serde::Serialize;
use uuid::Uuid;

use crate::error::HekimResult;
use crate::models::{
    hospital::{CreateHospital, Hospital},
    polyclinic::{CreatePolyclinic, HospitalPolyclinic, UpdatePolyclinic},
    reference::{District, JobGroup, JobTitle, PolyclinicType, Province},
    staff::{CreateStaff, Staff, StaffCount, StaffFilter, UpdateStaff},
    user::{CreateUser, UpdateUser, User},
};

/// Page-based pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    pub const DEFAULT_PAGE_SIZE: u64 = 10;
    pub const MAX_PAGE_SIZE: u64 = 100;
    pub const MAX_PAGE: u64 = 1_000_000;

    /// Clamp client-supplied values: page is held to `1..=MAX_PAGE`, a page
    /// size outside `1..=100` becomes the default.
    pub fn new(page: u64, page_size: u64) -> Self {
        let page = page.clamp(1, Self::MAX_PAGE);
        let page_size = if (1..=Self::MAX_PAGE_SIZE).contains(&page_size) {
            page_size
        } else {
            Self::DEFAULT_PAGE_SIZE
        };
        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pagination: Pagination,
}

impl<T> PaginatedResult<T> {
    pub fn info(&self) -> PageInfo {
        let size = self.pagination.page_size;
        let total_pages = self.total.div_ceil(size);
        PageInfo {
            current_page: self.pagination.page,
            page_size: size,
            total_records: self.total,
            total_pages,
            has_next: self.pagination.page < total_pages,
            has_prev: self.pagination.page > 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pagination: self.pagination,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: u64,
    pub page_size: u64,
    pub total_records: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

// ---------------------------------------------------------------------------
// Hospitals and users
// ---------------------------------------------------------------------------

pub trait HospitalRepository: Send + Sync {
    /// Create the hospital and its first admin in one transaction. Either
    /// both rows exist afterwards or neither does.
    fn create_with_admin(
        &self,
        hospital: CreateHospital,
        admin: CreateUser,
    ) -> impl Future<Output = HekimResult<(Hospital, User)>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HekimResult<Hospital>> + Send;
    fn exists_by_tax_id(&self, tax_id: &str) -> impl Future<Output = HekimResult<bool>> + Send;
    fn exists_by_email(&self, email: &str) -> impl Future<Output = HekimResult<bool>> + Send;
    fn exists_by_phone(&self, phone: &str) -> impl Future<Output = HekimResult<bool>> + Send;
}

pub trait UserRepository: Send + Sync {
    fn create(
        &self,
        hospital_id: Uuid,
        input: CreateUser,
    ) -> impl Future<Output = HekimResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HekimResult<User>> + Send;
    fn find_by_email(&self, email: &str) -> impl Future<Output = HekimResult<Option<User>>> + Send;
    fn find_by_phone(&self, phone: &str) -> impl Future<Output = HekimResult<Option<User>>> + Send;
    /// Uniqueness probes; `exclude` skips the record being updated.
    fn exists_by_national_id(
        &self,
        national_id: &str,
        exclude: Option<Uuid>,
    ) -> impl Future<Output = HekimResult<bool>> + Send;
    fn exists_by_email(
        &self,
        email: &str,
        exclude: Option<Uuid>,
    ) -> impl Future<Output = HekimResult<bool>> + Send;
    fn exists_by_phone(
        &self,
        phone: &str,
        exclude: Option<Uuid>,
    ) -> impl Future<Output = HekimResult<bool>> + Send;
    fn update(&self, id: Uuid, input: UpdateUser) -> impl Future<Output = HekimResult<User>> + Send;
    fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: String,
    ) -> impl Future<Output = HekimResult<()>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn deactivate(&self, id: Uuid) -> impl Future<Output = HekimResult<()>> + Send;
    fn list_by_hospital(
        &self,
        hospital_id: Uuid,
    ) -> impl Future<Output = HekimResult<Vec<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Staff and polyclinics (tenant-scoped)
// ---------------------------------------------------------------------------

pub trait StaffRepository: Send + Sync {
    fn create(
        &self,
        hospital_id: Uuid,
        input: CreateStaff,
    ) -> impl Future<Output = HekimResult<Staff>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HekimResult<Staff>> + Send;
    fn update(&self, id: Uuid, input: UpdateStaff)
    -> impl Future<Output = HekimResult<Staff>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn deactivate(&self, id: Uuid) -> impl Future<Output = HekimResult<()>> + Send;
    fn exists_by_national_id(
        &self,
        national_id: &str,
        exclude: Option<Uuid>,
    ) -> impl Future<Output = HekimResult<bool>> + Send;
    fn exists_by_phone(
        &self,
        phone: &str,
        exclude: Option<Uuid>,
    ) -> impl Future<Output = HekimResult<bool>> + Send;
    /// Active staff of `hospital_id` holding `job_title_id`.
    fn count_active_with_job_title(
        &self,
        hospital_id: Uuid,
        job_title_id: Uuid,
        exclude: Option<Uuid>,
    ) -> impl Future<Output = HekimResult<u64>> + Send;
    /// Filtered page ordered by first name, then last name.
    fn list(
        &self,
        hospital_id: Uuid,
        filter: &StaffFilter,
        pagination: Pagination,
    ) -> impl Future<Output = HekimResult<PaginatedResult<Staff>>> + Send;
    /// Active staff counts grouped by polyclinic and job group.
    fn count_active_by_polyclinic(
        &self,
        hospital_id: Uuid,
    ) -> impl Future<Output = HekimResult<Vec<StaffCount>>> + Send;
}

pub trait PolyclinicRepository: Send + Sync {
    fn create(
        &self,
        hospital_id: Uuid,
        input: CreatePolyclinic,
    ) -> impl Future<Output = HekimResult<HospitalPolyclinic>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HekimResult<HospitalPolyclinic>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdatePolyclinic,
    ) -> impl Future<Output = HekimResult<HospitalPolyclinic>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn deactivate(&self, id: Uuid) -> impl Future<Output = HekimResult<()>> + Send;
    /// Whether the hospital already has an active polyclinic of this type.
    fn active_type_exists(
        &self,
        hospital_id: Uuid,
        polyclinic_type_id: Uuid,
        exclude: Option<Uuid>,
    ) -> impl Future<Output = HekimResult<bool>> + Send;
    fn list_by_hospital(
        &self,
        hospital_id: Uuid,
        active_only: bool,
    ) -> impl Future<Output = HekimResult<Vec<HospitalPolyclinic>>> + Send;
}

// ---------------------------------------------------------------------------
// Reference catalogs (global, read-mostly)
// ---------------------------------------------------------------------------

/// Catalog queries. Every list is ordered by name ascending.
pub trait ReferenceRepository: Send + Sync {
    fn provinces(&self) -> impl Future<Output = HekimResult<Vec<Province>>> + Send;
    fn districts(
        &self,
        province_id: Uuid,
    ) -> impl Future<Output = HekimResult<Vec<District>>> + Send;
    fn district_in_province(
        &self,
        district_id: Uuid,
        province_id: Uuid,
    ) -> impl Future<Output = HekimResult<bool>> + Send;
    fn job_groups(&self) -> impl Future<Output = HekimResult<Vec<JobGroup>>> + Send;
    fn job_titles(
        &self,
        job_group_id: Uuid,
    ) -> impl Future<Output = HekimResult<Vec<JobTitle>>> + Send;
    fn get_job_title(&self, id: Uuid) -> impl Future<Output = HekimResult<Option<JobTitle>>> + Send;
    fn polyclinic_types(&self) -> impl Future<Output = HekimResult<Vec<PolyclinicType>>> + Send;
    fn get_polyclinic_type(
        &self,
        id: Uuid,
    ) -> impl Future<Output = HekimResult<Option<PolyclinicType>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_values() {
        assert_eq!(Pagination::new(0, 0), Pagination { page: 1, page_size: 10 });
        assert_eq!(Pagination::new(3, 101).page_size, 10);
        assert_eq!(Pagination::new(3, 100).page_size, 100);
        assert_eq!(Pagination::new(3, 20).offset(), 40);
    }

    #[test]
    fn huge_page_numbers_are_clamped() {
        let pagination = Pagination::new(u64::MAX, 10);
        assert_eq!(pagination.page, Pagination::MAX_PAGE);
        assert_eq!(pagination.offset(), (Pagination::MAX_PAGE - 1) * 10);

        let raw = Pagination {
            page: u64::MAX,
            page_size: 100,
        };
        assert_eq!(raw.offset(), u64::MAX);
    }

    #[test]
    fn page_info_reports_neighbours() {
        let page = PaginatedResult::<u8> {
            items: vec![],
            total: 45,
            pagination: Pagination::new(2, 10),
        };
        let info = page.info();
        assert_eq!(info.total_pages, 5);
        assert!(info.has_next);
        assert!(info.has_prev);

        let last = PaginatedResult::<u8> {
            items: vec![],
            total: 45,
            pagination: Pagination::new(5, 10),
        };
        assert!(!last.info().has_next);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page = PaginatedResult::<u8> {
            items: vec![],
            total: 0,
            pagination: Pagination::default(),
        };
        let info = page.info();
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next);
        assert!(!info.has_prev);
    }
}
