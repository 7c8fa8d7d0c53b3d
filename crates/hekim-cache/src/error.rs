//! Cache-layer error types and conversions.

use std::time::Duration;

use hekim_core::error::HekimError;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Cache payload could not be decoded: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Ephemeral store unavailable")]
    Unavailable,

    #[error("Ephemeral store failed: {0}")]
    Store(String),
}

impl From<CacheError> for HekimError {
    fn from(err: CacheError) -> Self {
        HekimError::Unavailable(err.to_string())
    }
}
