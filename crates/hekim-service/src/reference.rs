//! Reference catalog reads, served through the read-through cache.

use std::collections::HashMap;

use hekim_cache::{CacheStats, ReferenceCache};
use hekim_core::ephemeral::EphemeralStore;
use hekim_core::error::HekimResult;
use hekim_core::models::reference::{District, JobGroup, JobTitle, PolyclinicType, Province};
use hekim_core::repository::ReferenceRepository;
use uuid::Uuid;

#[derive(Clone)]
pub struct CatalogService<R: ReferenceRepository, E: EphemeralStore> {
    refs: R,
    cache: ReferenceCache<E>,
}

impl<R: ReferenceRepository, E: EphemeralStore> CatalogService<R, E> {
    pub fn new(refs: R, cache: ReferenceCache<E>) -> Self {
        Self { refs, cache }
    }

    /// Uncached repository access, for validation lookups.
    pub fn repository(&self) -> &R {
        &self.refs
    }

    pub async fn provinces(&self) -> HekimResult<Vec<Province>> {
        self.cache.provinces(|| self.refs.provinces()).await
    }

    pub async fn districts(&self, province_id: Uuid) -> HekimResult<Vec<District>> {
        self.cache
            .districts(province_id, || self.refs.districts(province_id))
            .await
    }

    pub async fn job_groups(&self) -> HekimResult<Vec<JobGroup>> {
        self.cache.job_groups(|| self.refs.job_groups()).await
    }

    pub async fn job_titles(&self, job_group_id: Uuid) -> HekimResult<Vec<JobTitle>> {
        self.cache
            .job_titles(job_group_id, || self.refs.job_titles(job_group_id))
            .await
    }

    pub async fn polyclinic_types(&self) -> HekimResult<Vec<PolyclinicType>> {
        self.cache
            .polyclinic_types(|| self.refs.polyclinic_types())
            .await
    }

    pub async fn invalidate(&self) -> HekimResult<u64> {
        self.cache.invalidate_all().await
    }

    pub async fn stats(&self) -> HekimResult<CacheStats> {
        self.cache.stats().await
    }

    pub async fn job_group_names(&self) -> HekimResult<HashMap<Uuid, String>> {
        Ok(self
            .job_groups()
            .await?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect())
    }

    pub async fn polyclinic_type_names(&self) -> HekimResult<HashMap<Uuid, String>> {
        Ok(self
            .polyclinic_types()
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect())
    }

    /// Titles of the given groups, keyed by title id.
    pub async fn job_title_names(
        &self,
        job_group_ids: &[Uuid],
    ) -> HekimResult<HashMap<Uuid, String>> {
        let mut groups = job_group_ids.to_vec();
        groups.sort();
        groups.dedup();

        let mut names = HashMap::new();
        for group_id in groups {
            names.extend(
                self.job_titles(group_id)
                    .await?
                    .into_iter()
                    .map(|t| (t.id, t.name)),
            );
        }
        Ok(names)
    }
}
