//! HTTP handlers, one module per resource.
//!
//! Handlers translate between JSON and the service layer. Permission, role
//! and tenant checks happen inside the services, except for the [`cache`]
//! operator routes, whose catalog service carries no caller and which check
//! the caller's permission level themselves.

pub mod auth;
pub mod cache;
pub mod hospital;
pub mod polyclinic;
pub mod reference;
pub mod staff;
pub mod users;
