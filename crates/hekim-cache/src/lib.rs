//! Hekim Cache: ephemeral store adapters and the read-through cache for
//! reference data.
//!
//! This crate provides:
//! - [`RedisStore`], the production [`EphemeralStore`](hekim_core::ephemeral::EphemeralStore)
//! - [`MemoryStore`], an in-process store driven by a [`Clock`](hekim_core::clock::Clock)
//! - [`EphemeralBackend`], which picks one of the two at startup
//! - [`ReferenceCache`], cache-aside access to the reference catalogs

mod backend;
mod config;
mod error;
pub mod keys;
mod memory;
mod redis_store;
mod reference;

pub use backend::EphemeralBackend;
pub use config::{CacheConfig, RedisConfig};
pub use error::CacheError;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use reference::{CacheStats, KeyStats, ReferenceCache};
