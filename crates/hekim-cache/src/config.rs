//! Cache and ephemeral store configuration.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Connection URL, e.g. `redis://127.0.0.1:6379/0`.
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Lifetime of every reference-data entry.
    pub ttl: Duration,
    /// Upper bound on any single cache round trip.
    pub op_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            op_timeout: Duration::from_millis(250),
        }
    }
}
