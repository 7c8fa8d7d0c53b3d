//! Domain models for Hekim.
//!
//! These are the core types shared across all crates. Request payloads
//! (`Create*`/`Update*`) live next to the entity they produce.

pub mod hospital;
pub mod polyclinic;
pub mod reference;
pub mod staff;
pub mod user;
