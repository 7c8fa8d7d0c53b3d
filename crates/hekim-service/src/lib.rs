//! Hekim Service: the operations behind the HTTP surface.
//!
//! Each service is generic over the repository traits of `hekim-core`, so
//! it can run against SurrealDB in production and the in-memory engine in
//! tests. Access checks happen here, on the [`AuthContext`] the caller
//! presents, before any row is touched.
//!
//! [`AuthContext`]: hekim_core::access::AuthContext

pub mod account;
pub mod hospital;
pub mod polyclinic;
pub mod reference;
pub mod rules;
pub mod staff;

pub use account::AccountService;
pub use hospital::{HospitalService, Registration};
pub use polyclinic::PolyclinicService;
pub use reference::CatalogService;
pub use staff::{StaffPage, StaffService};
