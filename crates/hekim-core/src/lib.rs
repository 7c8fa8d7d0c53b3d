//! Hekim core: domain models, access rules, store abstractions and the
//! shared error type.

pub mod access;
pub mod clock;
pub mod ephemeral;
pub mod error;
pub mod models;
pub mod repository;
