//! Hekim Database: SurrealDB connection management, schema migrations,
//! reference-data seeding and repository implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Catalog bootstrap ([`ReferenceSeed`])
//! - Error types ([`DbError`])
//! - Implementations of the `hekim-core` repository traits ([`repository`])

mod connection;
mod error;
pub mod repository;
mod schema;
mod seed;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
pub use seed::{JobGroupSeed, JobTitleSeed, PolyclinicTypeSeed, ProvinceSeed, ReferenceSeed};
