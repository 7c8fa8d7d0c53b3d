//! SurrealDB repository implementations.

mod hospital;
mod polyclinic;
mod reference;
mod staff;
mod user;

pub use hospital::SurrealHospitalRepository;
pub use polyclinic::SurrealPolyclinicRepository;
pub use reference::SurrealReferenceRepository;
pub use staff::SurrealStaffRepository;
pub use user::SurrealUserRepository;

use surrealdb_types::SurrealValue;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub total: u64,
}

impl CountRow {
    pub(crate) fn total(rows: Vec<CountRow>) -> u64 {
        rows.first().map(|r| r.total).unwrap_or(0)
    }
}

/// `AND meta::id(id) != $exclude` when a record must be skipped.
pub(crate) fn exclude_clause(exclude: Option<uuid::Uuid>) -> &'static str {
    if exclude.is_some() {
        " AND meta::id(id) != $exclude"
    } else {
        ""
    }
}
