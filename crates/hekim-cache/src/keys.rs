//! Key layout of the `master_data:` namespace.

use uuid::Uuid;

pub const PROVINCES: &str = "master_data:provinces";
pub const JOB_GROUPS: &str = "master_data:job_groups";
pub const POLYCLINIC_TYPES: &str = "master_data:polyclinic_types";

pub const DISTRICTS_PREFIX: &str = "master_data:districts:province:";
pub const JOB_TITLES_PREFIX: &str = "master_data:job_titles:group:";

/// Keys that exist at most once.
pub const FIXED: [&str; 3] = [PROVINCES, JOB_GROUPS, POLYCLINIC_TYPES];

pub fn districts(province_id: Uuid) -> String {
    format!("{DISTRICTS_PREFIX}{province_id}")
}

pub fn job_titles(job_group_id: Uuid) -> String {
    format!("{JOB_TITLES_PREFIX}{job_group_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameterised_keys_share_their_prefix() {
        let id = Uuid::new_v4();
        assert!(districts(id).starts_with(DISTRICTS_PREFIX));
        assert!(job_titles(id).ends_with(&id.to_string()));
        assert!(FIXED.iter().all(|k| k.starts_with("master_data:")));
    }
}
