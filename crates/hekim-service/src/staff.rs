//! Hospital staff management.

use std::collections::HashMap;

use hekim_core::access::{AuthContext, PermissionLevel, ensure_same_tenant, require_permission};
use hekim_core::ephemeral::EphemeralStore;
use hekim_core::error::HekimResult;
use hekim_core::models::staff::{
    CreateStaff, Staff, StaffFilter, StaffSummary, UpdateStaff, work_days_text,
};
use hekim_core::repository::{
    PageInfo, Pagination, PolyclinicRepository, ReferenceRepository, StaffRepository,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::reference::CatalogService;
use crate::rules::{self, StaffSubmission};

/// One page of the staff listing.
#[derive(Debug, Serialize)]
pub struct StaffPage {
    pub items: Vec<StaffSummary>,
    pub pagination: PageInfo,
}

pub struct StaffService<S, P, R, E>
where
    S: StaffRepository,
    P: PolyclinicRepository,
    R: ReferenceRepository,
    E: EphemeralStore,
{
    staff: S,
    polyclinics: P,
    catalog: CatalogService<R, E>,
}

impl<S, P, R, E> StaffService<S, P, R, E>
where
    S: StaffRepository,
    P: PolyclinicRepository,
    R: ReferenceRepository,
    E: EphemeralStore,
{
    pub fn new(staff: S, polyclinics: P, catalog: CatalogService<R, E>) -> Self {
        Self {
            staff,
            polyclinics,
            catalog,
        }
    }

    pub async fn create(&self, ctx: &AuthContext, input: CreateStaff) -> HekimResult<Staff> {
        require_permission(ctx, PermissionLevel::Admin)?;

        rules::staff_violations(
            &self.staff,
            &self.polyclinics,
            self.catalog.repository(),
            ctx.hospital_id,
            StaffSubmission {
                national_id: Some(&input.national_id),
                phone: &input.phone,
                job_group_id: input.job_group_id,
                job_title_id: input.job_title_id,
                polyclinic_id: input.polyclinic_id,
                work_days: &input.work_days,
                is_active: true,
            },
            None,
        )
        .await?
        .into_result()?;

        let staff = self.staff.create(ctx.hospital_id, input).await?;
        info!(hospital_id = %ctx.hospital_id, staff_id = %staff.id, "Staff member created");
        Ok(staff)
    }

    pub async fn get(&self, ctx: &AuthContext, id: Uuid) -> HekimResult<Staff> {
        require_permission(ctx, PermissionLevel::Read)?;
        self.owned(ctx, id).await
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        input: UpdateStaff,
    ) -> HekimResult<Staff> {
        require_permission(ctx, PermissionLevel::Admin)?;
        self.owned(ctx, id).await?;

        rules::staff_violations(
            &self.staff,
            &self.polyclinics,
            self.catalog.repository(),
            ctx.hospital_id,
            StaffSubmission {
                national_id: None,
                phone: &input.phone,
                job_group_id: input.job_group_id,
                job_title_id: input.job_title_id,
                polyclinic_id: input.polyclinic_id,
                work_days: &input.work_days,
                is_active: input.is_active,
            },
            Some(id),
        )
        .await?
        .into_result()?;

        let staff = self.staff.update(id, input).await?;
        info!(hospital_id = %ctx.hospital_id, staff_id = %id, "Staff member updated");
        Ok(staff)
    }

    /// Soft delete.
    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> HekimResult<()> {
        require_permission(ctx, PermissionLevel::Admin)?;
        self.owned(ctx, id).await?;
        self.staff.deactivate(id).await?;
        info!(hospital_id = %ctx.hospital_id, staff_id = %id, "Staff member deactivated");
        Ok(())
    }

    pub async fn list(
        &self,
        ctx: &AuthContext,
        filter: &StaffFilter,
        pagination: Pagination,
    ) -> HekimResult<StaffPage> {
        require_permission(ctx, PermissionLevel::Read)?;
        let page = self
            .staff
            .list(ctx.hospital_id, filter, pagination)
            .await?;

        let group_ids: Vec<Uuid> = page.items.iter().map(|s| s.job_group_id).collect();
        let groups = self.catalog.job_group_names().await?;
        let titles = self.catalog.job_title_names(&group_ids).await?;
        let clinic_names = self.polyclinic_names(ctx.hospital_id).await?;

        let info = page.info();
        let items = page
            .map(|s| StaffSummary {
                job_group_name: name_or_blank(&groups, s.job_group_id),
                job_title_name: name_or_blank(&titles, s.job_title_id),
                polyclinic_type_name: s
                    .polyclinic_id
                    .and_then(|id| clinic_names.get(&id).cloned()),
                work_days_text: work_days_text(&s.work_days),
                id: s.id,
                first_name: s.first_name,
                last_name: s.last_name,
                national_id: s.national_id,
                phone: s.phone,
                is_active: s.is_active,
            })
            .items;

        Ok(StaffPage {
            items,
            pagination: info,
        })
    }

    /// Load a staff row and check it belongs to the caller's hospital.
    async fn owned(&self, ctx: &AuthContext, id: Uuid) -> HekimResult<Staff> {
        let staff = self.staff.get_by_id(id).await?;
        ensure_same_tenant(ctx, staff.hospital_id)?;
        Ok(staff)
    }

    /// Type name of every polyclinic of the hospital, keyed by polyclinic id.
    async fn polyclinic_names(&self, hospital_id: Uuid) -> HekimResult<HashMap<Uuid, String>> {
        let types = self.catalog.polyclinic_type_names().await?;
        Ok(self
            .polyclinics
            .list_by_hospital(hospital_id, false)
            .await?
            .into_iter()
            .filter_map(|p| types.get(&p.polyclinic_type_id).map(|n| (p.id, n.clone())))
            .collect())
    }
}

fn name_or_blank(names: &HashMap<Uuid, String>, id: Uuid) -> String {
    names.get(&id).cloned().unwrap_or_default()
}
