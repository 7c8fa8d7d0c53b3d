//! Submission checks that need the store.
//!
//! Every check runs and every failure is collected, so one response can
//! name all offending fields. A store error while checking aborts the
//! whole evaluation. The checks are advisory: the store's unique indexes
//! remain the final word and surface as `Conflict`.

use hekim_core::error::{FieldViolation, HekimError, HekimResult};
use hekim_core::models::hospital::RegisterHospital;
use hekim_core::repository::{
    HospitalRepository, PolyclinicRepository, ReferenceRepository, StaffRepository,
    UserRepository,
};
use uuid::Uuid;

const TAKEN: &str = "is already in use";

/// Accumulates violations for one submission.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    /// Record `message` against `field` when `failed` holds.
    pub fn check(&mut self, failed: bool, field: &str, message: impl Into<String>) {
        if failed {
            self.push(field, message);
        }
    }

    pub fn extend(&mut self, other: Violations) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<FieldViolation> {
        self.0
    }

    /// `Validation` carrying every violation, or `Ok` when there are none.
    pub fn into_result(self) -> HekimResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(HekimError::Validation(self.0))
        }
    }
}

pub fn password_violation(field: &str, password: &str, min_length: usize) -> Violations {
    let mut v = Violations::new();
    v.check(
        password.chars().count() < min_length,
        field,
        format!("must be at least {min_length} characters"),
    );
    v
}

pub fn work_day_violations(days: &[u8]) -> Violations {
    let mut v = Violations::new();
    if days.is_empty() {
        v.push("work_days", "at least one work day is required");
    } else if days.iter().any(|d| !(1..=7).contains(d)) {
        v.push("work_days", "work days must be between 1 (Monday) and 7 (Sunday)");
    }
    v
}

/// Fields of a user account that must be unique across all hospitals.
pub struct UserIdentity<'a> {
    pub national_id: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
}

/// Field names under which identity clashes are reported.
pub struct IdentityFields {
    pub national_id: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
}

impl IdentityFields {
    pub const ADMIN: IdentityFields = IdentityFields {
        national_id: "admin_tc",
        email: "admin_email",
        phone: "admin_phone",
    };
    pub const USER: IdentityFields = IdentityFields {
        national_id: "tc",
        email: "email",
        phone: "phone",
    };
}

pub async fn user_identity_violations<U: UserRepository>(
    users: &U,
    identity: UserIdentity<'_>,
    fields: &IdentityFields,
    exclude: Option<Uuid>,
) -> HekimResult<Violations> {
    let mut v = Violations::new();
    if let Some(national_id) = identity.national_id {
        v.check(
            users.exists_by_national_id(national_id, exclude).await?,
            fields.national_id,
            format!("national id {TAKEN}"),
        );
    }
    if let Some(email) = identity.email {
        v.check(
            users.exists_by_email(email, exclude).await?,
            fields.email,
            format!("email address {TAKEN}"),
        );
    }
    if let Some(phone) = identity.phone {
        v.check(
            users.exists_by_phone(phone, exclude).await?,
            fields.phone,
            format!("phone number {TAKEN}"),
        );
    }
    Ok(v)
}

pub async fn registration_violations<H, U, R>(
    hospitals: &H,
    users: &U,
    refs: &R,
    input: &RegisterHospital,
    min_password_length: usize,
) -> HekimResult<Violations>
where
    H: HospitalRepository,
    U: UserRepository,
    R: ReferenceRepository,
{
    let mut v = Violations::new();
    v.check(
        hospitals.exists_by_tax_id(&input.tax_id).await?,
        "tax_id",
        format!("tax id {TAKEN}"),
    );
    v.check(
        hospitals.exists_by_email(&input.hospital_email).await?,
        "hospital_email",
        format!("email address {TAKEN}"),
    );
    v.check(
        hospitals.exists_by_phone(&input.hospital_phone).await?,
        "hospital_phone",
        format!("phone number {TAKEN}"),
    );
    v.check(
        !refs
            .district_in_province(input.district_id, input.province_id)
            .await?,
        "district_id",
        "district does not belong to the selected province",
    );
    v.extend(
        user_identity_violations(
            users,
            UserIdentity {
                national_id: Some(&input.admin_national_id),
                email: Some(&input.admin_email),
                phone: Some(&input.admin_phone),
            },
            &IdentityFields::ADMIN,
            None,
        )
        .await?,
    );
    v.extend(password_violation(
        "admin_password",
        &input.admin_password,
        min_password_length,
    ));
    Ok(v)
}

/// The staff fields that take part in validation.
pub struct StaffSubmission<'a> {
    /// `None` on update, where the national id is immutable.
    pub national_id: Option<&'a str>,
    pub phone: &'a str,
    pub job_group_id: Uuid,
    pub job_title_id: Uuid,
    pub polyclinic_id: Option<Uuid>,
    pub work_days: &'a [u8],
    /// Whether the record will be active after the write.
    pub is_active: bool,
}

pub async fn staff_violations<S, P, R>(
    staff: &S,
    polyclinics: &P,
    refs: &R,
    hospital_id: Uuid,
    input: StaffSubmission<'_>,
    exclude: Option<Uuid>,
) -> HekimResult<Violations>
where
    S: StaffRepository,
    P: PolyclinicRepository,
    R: ReferenceRepository,
{
    let mut v = Violations::new();
    if let Some(national_id) = input.national_id {
        v.check(
            staff.exists_by_national_id(national_id, exclude).await?,
            "tc",
            format!("national id {TAKEN}"),
        );
    }
    v.check(
        staff.exists_by_phone(input.phone, exclude).await?,
        "phone",
        format!("phone number {TAKEN}"),
    );

    match refs.get_job_title(input.job_title_id).await? {
        None => v.push("job_title_id", "job title does not exist"),
        Some(title) if title.job_group_id != input.job_group_id => {
            v.push("job_title_id", "job title does not belong to the selected job group")
        }
        Some(title) if title.is_unique && input.is_active => {
            let holders = staff
                .count_active_with_job_title(hospital_id, title.id, exclude)
                .await?;
            v.check(
                holders > 0,
                "job_title_id",
                format!("this hospital already has an active {}", title.name),
            );
        }
        Some(_) => {}
    }

    if let Some(polyclinic_id) = input.polyclinic_id {
        let owned = match polyclinics.get_by_id(polyclinic_id).await {
            Ok(p) => p.hospital_id == hospital_id,
            Err(HekimError::NotFound { .. }) => false,
            Err(e) => return Err(e),
        };
        v.check(
            !owned,
            "polyclinic_id",
            "polyclinic does not belong to this hospital",
        );
    }

    v.extend(work_day_violations(input.work_days));
    Ok(v)
}

pub async fn polyclinic_violations<P, R>(
    polyclinics: &P,
    refs: &R,
    hospital_id: Uuid,
    polyclinic_type_id: Uuid,
    exclude: Option<Uuid>,
) -> HekimResult<Violations>
where
    P: PolyclinicRepository,
    R: ReferenceRepository,
{
    let mut v = Violations::new();
    if refs.get_polyclinic_type(polyclinic_type_id).await?.is_none() {
        v.push("polyclinic_type_id", "polyclinic type does not exist");
        return Ok(v);
    }
    v.check(
        polyclinics
            .active_type_exists(hospital_id, polyclinic_type_id, exclude)
            .await?,
        "polyclinic_type_id",
        "an active polyclinic of this type already exists in this hospital",
    );
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_days_must_be_present_and_in_range() {
        assert!(work_day_violations(&[1, 2, 7]).is_empty());
        assert_eq!(work_day_violations(&[]).into_vec()[0].field, "work_days");
        assert_eq!(work_day_violations(&[0, 3]).into_vec().len(), 1);
        assert_eq!(work_day_violations(&[8]).into_vec().len(), 1);
    }

    #[test]
    fn password_length_counts_characters() {
        assert!(password_violation("password", "şğüçöı", 6).is_empty());
        assert!(!password_violation("password", "abc", 6).is_empty());
    }

    #[test]
    fn violations_accumulate_into_one_error() {
        let mut v = Violations::new();
        v.check(true, "tax_id", "taken");
        v.check(false, "hospital_email", "taken");
        v.extend(work_day_violations(&[]));
        match v.into_result() {
            Err(HekimError::Validation(list)) => {
                let fields: Vec<_> = list.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(fields, ["tax_id", "work_days"]);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert!(Violations::new().into_result().is_ok());
    }
}
