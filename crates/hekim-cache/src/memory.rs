//! In-process [`EphemeralStore`] for tests and single-node development.
//!
//! Expiry is evaluated lazily against the injected clock, so advancing a
//! [`ManualClock`](hekim_core::clock::ManualClock) expires entries without
//! sleeping.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use hekim_core::clock::{Clock, SystemClock};
use hekim_core::ephemeral::EphemeralStore;
use hekim_core::error::HekimResult;
use parking_lot::Mutex;

use crate::error::CacheError;

struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

struct Inner {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    unavailable: AtomicBool,
}

#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                clock,
                unavailable: AtomicBool::new(false),
            }),
        }
    }

    /// Simulate an outage: every operation fails until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = self.inner.clock.now();
        self.inner
            .entries
            .lock()
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable);
        }
        Ok(())
    }

    /// Lock the map after dropping every entry that has expired.
    fn live(&self) -> parking_lot::MutexGuard<'_, HashMap<String, Entry>> {
        let now = self.inner.clock.now();
        let mut entries = self.inner.entries.lock();
        entries.retain(|_, e| e.expires_at > now);
        entries
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl EphemeralStore for MemoryStore {
    async fn get(&self, key: &str) -> HekimResult<Option<String>> {
        self.check()?;
        Ok(self.live().get(key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> HekimResult<()> {
        self.check()?;
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| hekim_core::error::HekimError::InvalidInput {
                message: format!("ttl out of range: {e}"),
            })?;
        let expires_at = self.inner.clock.now() + ttl;
        self.live()
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> HekimResult<u64> {
        self.check()?;
        let mut entries = self.live();
        let removed = keys.iter().filter(|k| entries.remove(*k).is_some()).count();
        Ok(removed as u64)
    }

    async fn ttl(&self, key: &str) -> HekimResult<Option<Duration>> {
        self.check()?;
        let now = self.inner.clock.now();
        Ok(self
            .live()
            .get(key)
            .and_then(|e| (e.expires_at - now).to_std().ok()))
    }

    async fn scan_prefix(&self, prefix: &str) -> HekimResult<Vec<String>> {
        self.check()?;
        let mut keys: Vec<String> = self
            .live()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}
