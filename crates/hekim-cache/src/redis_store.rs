//! Redis-backed [`EphemeralStore`].

use std::time::Duration;

use hekim_core::ephemeral::EphemeralStore;
use hekim_core::error::HekimResult;
use redis::aio::ConnectionManager;
use tracing::info;

use crate::config::RedisConfig;
use crate::error::CacheError;

/// Number of keys requested per SCAN round trip.
const SCAN_BATCH: usize = 200;

/// Shares one multiplexed connection that reconnects on failure.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(config: &RedisConfig) -> Result<Self, CacheError> {
        info!(url = %config.url, "Connecting to Redis");
        let client = redis::Client::open(config.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    pub fn from_manager(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

impl EphemeralStore for RedisStore {
    async fn get(&self, key: &str) -> HekimResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(CacheError::from)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> HekimResult<()> {
        let mut conn = self.conn.clone();
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(millis)
            .query_async(&mut conn)
            .await
            .map_err(CacheError::from)?;
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> HekimResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        let removed: u64 = redis::cmd("DEL")
            .arg(keys)
            .query_async(&mut conn)
            .await
            .map_err(CacheError::from)?;
        Ok(removed)
    }

    async fn ttl(&self, key: &str) -> HekimResult<Option<Duration>> {
        let mut conn = self.conn.clone();
        // -2: no such key, -1: no expiry.
        let millis: i64 = redis::cmd("PTTL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(CacheError::from)?;
        Ok(match millis {
            -2 => None,
            -1 => Some(Duration::MAX),
            ms => Some(Duration::from_millis(ms.max(0) as u64)),
        })
    }

    async fn scan_prefix(&self, prefix: &str) -> HekimResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(CacheError::from)?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}
