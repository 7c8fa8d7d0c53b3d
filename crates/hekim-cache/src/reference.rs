//! Cache-aside access to the reference catalogs.
//!
//! Every read first consults the ephemeral store. A hit is decoded and
//! returned; a miss, a store failure, a timeout or an undecodable payload
//! all fall through to the loader, whose result is written back on a best
//! effort basis. Callers therefore never see cache faults, only the
//! catalog data or the loader's own error.

use std::future::Future;
use std::time::Duration;

use hekim_core::ephemeral::EphemeralStore;
use hekim_core::error::HekimResult;
use hekim_core::models::reference::{District, JobGroup, JobTitle, PolyclinicType, Province};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::keys;

/// Presence and remaining lifetime of one cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyStats {
    pub key: String,
    pub exists: bool,
    /// Remaining lifetime in whole seconds, when the key exists.
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: Vec<KeyStats>,
    pub district_lists: usize,
    pub job_title_lists: usize,
}

#[derive(Clone)]
pub struct ReferenceCache<E: EphemeralStore> {
    store: E,
    config: CacheConfig,
}

impl<E: EphemeralStore> ReferenceCache<E> {
    pub fn new(store: E, config: CacheConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &E {
        &self.store
    }

    /// Read `key`, or run `loader` and cache what it returns.
    pub async fn get_or_load<T, F, Fut>(&self, key: &str, loader: F) -> HekimResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = HekimResult<T>>,
    {
        match self.read::<T>(key).await {
            Ok(Some(value)) => {
                debug!(key, "Reference cache hit");
                return Ok(value);
            }
            Ok(None) => debug!(key, "Reference cache miss"),
            Err(err) => warn!(key, error = %err, "Reference cache read failed, using loader"),
        }

        let value = loader().await?;

        if let Err(err) = self.write(key, &value).await {
            warn!(key, error = %err, "Reference cache write failed");
        }
        Ok(value)
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let raw = self
            .bounded(self.store.get(key))
            .await?
            .map_err(|e| CacheError::Store(e.to_string()))?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let payload = serde_json::to_string(value)?;
        self.bounded(self.store.set(key, payload, self.config.ttl))
            .await?
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    async fn bounded<O>(&self, op: impl Future<Output = O>) -> Result<O, CacheError> {
        tokio::time::timeout(self.config.op_timeout, op)
            .await
            .map_err(|_| CacheError::Timeout(self.config.op_timeout))
    }

    pub async fn provinces<F, Fut>(&self, loader: F) -> HekimResult<Vec<Province>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HekimResult<Vec<Province>>>,
    {
        self.get_or_load(keys::PROVINCES, loader).await
    }

    pub async fn districts<F, Fut>(&self, province_id: Uuid, loader: F) -> HekimResult<Vec<District>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HekimResult<Vec<District>>>,
    {
        self.get_or_load(&keys::districts(province_id), loader).await
    }

    pub async fn job_groups<F, Fut>(&self, loader: F) -> HekimResult<Vec<JobGroup>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HekimResult<Vec<JobGroup>>>,
    {
        self.get_or_load(keys::JOB_GROUPS, loader).await
    }

    pub async fn job_titles<F, Fut>(&self, job_group_id: Uuid, loader: F) -> HekimResult<Vec<JobTitle>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HekimResult<Vec<JobTitle>>>,
    {
        self.get_or_load(&keys::job_titles(job_group_id), loader).await
    }

    pub async fn polyclinic_types<F, Fut>(&self, loader: F) -> HekimResult<Vec<PolyclinicType>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HekimResult<Vec<PolyclinicType>>>,
    {
        self.get_or_load(keys::POLYCLINIC_TYPES, loader).await
    }

    /// Drop every reference-data key, returning how many were removed.
    ///
    /// Unlike reads, invalidation surfaces store failures: an operator who
    /// asked for a flush must learn that it did not happen.
    pub async fn invalidate_all(&self) -> HekimResult<u64> {
        let mut doomed: Vec<String> = keys::FIXED.iter().map(|k| (*k).to_string()).collect();
        doomed.extend(self.store.scan_prefix(keys::DISTRICTS_PREFIX).await?);
        doomed.extend(self.store.scan_prefix(keys::JOB_TITLES_PREFIX).await?);

        let removed = self.store.delete(&doomed).await?;
        info!(removed, "Reference cache invalidated");
        Ok(removed)
    }

    pub async fn stats(&self) -> HekimResult<CacheStats> {
        let mut entries = Vec::with_capacity(keys::FIXED.len());
        for key in keys::FIXED {
            let ttl = self.store.ttl(key).await?;
            entries.push(KeyStats {
                key: key.to_string(),
                exists: ttl.is_some(),
                ttl_secs: ttl.map(|d| d.as_secs()),
            });
        }
        let district_lists = self.store.scan_prefix(keys::DISTRICTS_PREFIX).await?.len();
        let job_title_lists = self.store.scan_prefix(keys::JOB_TITLES_PREFIX).await?.len();

        Ok(CacheStats {
            entries,
            district_lists,
            job_title_lists,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }
}
