//! Runtime choice between the Redis and in-process stores.

use std::time::Duration;

use hekim_core::ephemeral::EphemeralStore;
use hekim_core::error::HekimResult;

use crate::memory::MemoryStore;
use crate::redis_store::RedisStore;

#[derive(Clone)]
pub enum EphemeralBackend {
    Redis(RedisStore),
    Memory(MemoryStore),
}

impl EphemeralBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            EphemeralBackend::Redis(_) => "redis",
            EphemeralBackend::Memory(_) => "memory",
        }
    }
}

impl From<RedisStore> for EphemeralBackend {
    fn from(store: RedisStore) -> Self {
        EphemeralBackend::Redis(store)
    }
}

impl From<MemoryStore> for EphemeralBackend {
    fn from(store: MemoryStore) -> Self {
        EphemeralBackend::Memory(store)
    }
}

impl EphemeralStore for EphemeralBackend {
    async fn get(&self, key: &str) -> HekimResult<Option<String>> {
        match self {
            EphemeralBackend::Redis(s) => s.get(key).await,
            EphemeralBackend::Memory(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> HekimResult<()> {
        match self {
            EphemeralBackend::Redis(s) => s.set(key, value, ttl).await,
            EphemeralBackend::Memory(s) => s.set(key, value, ttl).await,
        }
    }

    async fn delete(&self, keys: &[String]) -> HekimResult<u64> {
        match self {
            EphemeralBackend::Redis(s) => s.delete(keys).await,
            EphemeralBackend::Memory(s) => s.delete(keys).await,
        }
    }

    async fn ttl(&self, key: &str) -> HekimResult<Option<Duration>> {
        match self {
            EphemeralBackend::Redis(s) => s.ttl(key).await,
            EphemeralBackend::Memory(s) => s.ttl(key).await,
        }
    }

    async fn scan_prefix(&self, prefix: &str) -> HekimResult<Vec<String>> {
        match self {
            EphemeralBackend::Redis(s) => s.scan_prefix(prefix).await,
            EphemeralBackend::Memory(s) => s.scan_prefix(prefix).await,
        }
    }
}
