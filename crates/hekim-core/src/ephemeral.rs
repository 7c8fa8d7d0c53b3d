//! Key/value store with per-key expiry.
//!
//! Backs both the reference-data cache and one-time reset codes. The two
//! uses share a store and are kept apart by key prefix only.

use std::time::Duration;

use crate::error::HekimResult;

pub trait EphemeralStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = HekimResult<Option<String>>> + Send;
    /// Store `value` under `key`, replacing any previous value and TTL.
    fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> impl Future<Output = HekimResult<()>> + Send;
    /// Remove keys, returning how many existed.
    fn delete(&self, keys: &[String]) -> impl Future<Output = HekimResult<u64>> + Send;
    /// Remaining lifetime; `None` when the key is absent.
    fn ttl(&self, key: &str) -> impl Future<Output = HekimResult<Option<Duration>>> + Send;
    /// All live keys starting with `prefix`.
    fn scan_prefix(&self, prefix: &str) -> impl Future<Output = HekimResult<Vec<String>>> + Send;
}
