//! Polyclinics opened at a hospital and their staffing summary.

use std::collections::HashMap;

use hekim_core::access::{AuthContext, PermissionLevel, ensure_same_tenant, require_permission};
use hekim_core::ephemeral::EphemeralStore;
use hekim_core::error::HekimResult;
use hekim_core::models::polyclinic::{
    CreatePolyclinic, HospitalPolyclinic, PolyclinicSummary, StaffCountByGroup, UpdatePolyclinic,
};
use hekim_core::repository::{PolyclinicRepository, ReferenceRepository, StaffRepository};
use tracing::info;
use uuid::Uuid;

use crate::reference::CatalogService;
use crate::rules;

pub struct PolyclinicService<P, S, R, E>
where
    P: PolyclinicRepository,
    S: StaffRepository,
    R: ReferenceRepository,
    E: EphemeralStore,
{
    polyclinics: P,
    staff: S,
    catalog: CatalogService<R, E>,
}

impl<P, S, R, E> PolyclinicService<P, S, R, E>
where
    P: PolyclinicRepository,
    S: StaffRepository,
    R: ReferenceRepository,
    E: EphemeralStore,
{
    pub fn new(polyclinics: P, staff: S, catalog: CatalogService<R, E>) -> Self {
        Self {
            polyclinics,
            staff,
            catalog,
        }
    }

    pub async fn add(
        &self,
        ctx: &AuthContext,
        input: CreatePolyclinic,
    ) -> HekimResult<HospitalPolyclinic> {
        require_permission(ctx, PermissionLevel::Admin)?;
        rules::polyclinic_violations(
            &self.polyclinics,
            self.catalog.repository(),
            ctx.hospital_id,
            input.polyclinic_type_id,
            None,
        )
        .await?
        .into_result()?;

        let polyclinic = self.polyclinics.create(ctx.hospital_id, input).await?;
        info!(
            hospital_id = %ctx.hospital_id,
            polyclinic_id = %polyclinic.id,
            "Polyclinic added"
        );
        Ok(polyclinic)
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        input: UpdatePolyclinic,
    ) -> HekimResult<HospitalPolyclinic> {
        require_permission(ctx, PermissionLevel::Admin)?;
        let existing = self.owned(ctx, id).await?;

        if input.is_active && !existing.is_active {
            rules::polyclinic_violations(
                &self.polyclinics,
                self.catalog.repository(),
                ctx.hospital_id,
                existing.polyclinic_type_id,
                Some(id),
            )
            .await?
            .into_result()?;
        }

        let polyclinic = self.polyclinics.update(id, input).await?;
        info!(hospital_id = %ctx.hospital_id, polyclinic_id = %id, "Polyclinic updated");
        Ok(polyclinic)
    }

    /// Soft delete.
    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> HekimResult<()> {
        require_permission(ctx, PermissionLevel::Admin)?;
        self.owned(ctx, id).await?;
        self.polyclinics.deactivate(id).await?;
        info!(hospital_id = %ctx.hospital_id, polyclinic_id = %id, "Polyclinic deactivated");
        Ok(())
    }

    /// Active polyclinics with their active staff counted per job group,
    /// ordered by polyclinic type name.
    pub async fn summaries(&self, ctx: &AuthContext) -> HekimResult<Vec<PolyclinicSummary>> {
        require_permission(ctx, PermissionLevel::Read)?;

        let polyclinics = self
            .polyclinics
            .list_by_hospital(ctx.hospital_id, true)
            .await?;
        let types = self.catalog.polyclinic_type_names().await?;
        let groups = self.catalog.job_group_names().await?;

        let mut counts: HashMap<Uuid, Vec<StaffCountByGroup>> = HashMap::new();
        for count in self.staff.count_active_by_polyclinic(ctx.hospital_id).await? {
            counts
                .entry(count.polyclinic_id)
                .or_default()
                .push(StaffCountByGroup {
                    job_group_name: groups
                        .get(&count.job_group_id)
                        .cloned()
                        .unwrap_or_default(),
                    count: count.total,
                });
        }

        let mut summaries: Vec<PolyclinicSummary> = polyclinics
            .into_iter()
            .map(|p| {
                let mut by_group = counts.remove(&p.id).unwrap_or_default();
                by_group.sort_by(|a, b| a.job_group_name.cmp(&b.job_group_name));
                PolyclinicSummary {
                    id: p.id,
                    polyclinic_type_name: types
                        .get(&p.polyclinic_type_id)
                        .cloned()
                        .unwrap_or_default(),
                    floor: p.floor,
                    room_number: p.room_number,
                    is_active: p.is_active,
                    total_staff_count: by_group.iter().map(|g| g.count).sum(),
                    staff_by_job_group: by_group,
                }
            })
            .collect();
        summaries.sort_by(|a, b| a.polyclinic_type_name.cmp(&b.polyclinic_type_name));
        Ok(summaries)
    }

    async fn owned(&self, ctx: &AuthContext, id: Uuid) -> HekimResult<HospitalPolyclinic> {
        let polyclinic = self.polyclinics.get_by_id(id).await?;
        ensure_same_tenant(ctx, polyclinic.hospital_id)?;
        Ok(polyclinic)
    }
}
