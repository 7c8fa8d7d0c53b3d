mod common;

use common::{ADMIN_PASSWORD, Harness};
use hekim_auth::LoginInput;
use hekim_core::access::{PermissionLevel, Role};
use hekim_core::error::{Denial, HekimError};
use hekim_core::models::user::UpdateUser;
use uuid::Uuid;

fn violated_fields(err: HekimError) -> Vec<String> {
    match err {
        HekimError::Validation(list) => list.into_iter().map(|v| v.field).collect(),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn registered_admin_can_log_in_to_the_same_tenant() {
    let h = Harness::new().await;
    let mut input = h.registration("sifa").await;
    input.tax_id = "1111111111".into();

    let registration = h.hospitals.register(input).await.unwrap();
    assert_eq!(registration.admin.role, Role::Admin);
    assert_eq!(registration.admin.hospital_id, registration.hospital.id);
    assert_eq!(registration.hospital.tax_id, "1111111111");
    let registered = h.context(&registration.token);
    assert_eq!(registered.hospital_id, registration.hospital.id);

    let login = h
        .accounts
        .login(LoginInput {
            identifier: "admin@sifa.example".into(),
            password: ADMIN_PASSWORD.into(),
        })
        .await
        .unwrap();
    let logged_in = h.context(&login.token);
    assert_eq!(logged_in.hospital_id, registered.hospital_id);
    assert_eq!(logged_in.role, Role::Admin);
    assert_eq!(logged_in.user_id, registered.user_id);

    let fetched = h.hospitals.get(registration.hospital.id).await.unwrap();
    assert_eq!(fetched.name, "Hastane sifa");
}

#[tokio::test]
async fn duplicate_hospital_identity_reports_every_field() {
    let h = Harness::new().await;
    h.register("first").await;

    let mut input = h.registration("second").await;
    input.tax_id = "tax-first".into();
    input.hospital_email = "info@first.example".into();
    input.hospital_phone = "0212first".into();

    let err = h.hospitals.register(input).await.unwrap_err();
    assert_eq!(
        violated_fields(err),
        ["tax_id", "hospital_email", "hospital_phone"]
    );
}

#[tokio::test]
async fn admin_identity_and_location_are_checked_together() {
    let h = Harness::new().await;
    h.register("first").await;

    let mut input = h.registration("second").await;
    input.admin_national_id = "nid-first".into();
    input.admin_email = "admin@first.example".into();
    input.admin_phone = "0555first".into();
    input.province_id = Uuid::new_v4();
    input.admin_password = "kisa".into();

    let err = h.hospitals.register(input).await.unwrap_err();
    assert_eq!(
        violated_fields(err),
        [
            "district_id",
            "admin_tc",
            "admin_email",
            "admin_phone",
            "admin_password"
        ]
    );
}

#[tokio::test]
async fn unknown_hospital_is_not_found() {
    let h = Harness::new().await;
    let err = h.hospitals.get(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, HekimError::NotFound { .. }));
}

#[tokio::test]
async fn sub_user_is_created_inside_the_admins_hospital() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;

    let user = h
        .accounts
        .create_sub_user(&tenant.admin, Harness::sub_user_input("w1", Role::Worker))
        .await
        .unwrap();
    assert_eq!(user.hospital_id, tenant.hospital_id());
    assert_eq!(user.created_by, Some(tenant.admin.user_id));
    assert_eq!(user.role, Role::Worker);

    let listed = h.accounts.list_sub_users(&tenant.admin).await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn worker_cannot_manage_users() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let worker = h.worker(&tenant, "w1").await;

    let err = h
        .accounts
        .create_sub_user(&worker, Harness::sub_user_input("w2", Role::Worker))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HekimError::Forbidden(Denial::InsufficientPermission {
            required: PermissionLevel::Admin,
            current: PermissionLevel::Read,
        })
    ));
    assert!(h.accounts.list_sub_users(&worker).await.is_err());
}

#[tokio::test]
async fn sub_user_identity_must_be_unique() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    h.worker(&tenant, "w1").await;

    let mut input = Harness::sub_user_input("w2", Role::Worker);
    input.email = "w1@staff.example".into();
    input.phone = "0555sifa".into();
    input.password = "123".into();

    let err = h
        .accounts
        .create_sub_user(&tenant.admin, input)
        .await
        .unwrap_err();
    assert_eq!(violated_fields(err), ["email", "phone", "password"]);
}

#[tokio::test]
async fn sub_user_update_excludes_itself_from_uniqueness() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let worker = h.worker(&tenant, "w1").await;

    let updated = h
        .accounts
        .update_sub_user(
            &tenant.admin,
            worker.user_id,
            UpdateUser {
                email: Some("w1@staff.example".into()),
                last_name: Some("Öztürk".into()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.last_name, "Öztürk");

    let err = h
        .accounts
        .update_sub_user(
            &tenant.admin,
            worker.user_id,
            UpdateUser {
                email: Some("admin@sifa.example".into()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(violated_fields(err), ["email"]);
}

#[tokio::test]
async fn foreign_sub_users_are_forbidden() {
    let h = Harness::new().await;
    let sifa = h.register("sifa").await;
    let deva = h.register("deva").await;
    let worker = h.worker(&deva, "w1").await;

    let update = h
        .accounts
        .update_sub_user(&sifa.admin, worker.user_id, UpdateUser::default())
        .await
        .unwrap_err();
    let delete = h
        .accounts
        .delete_sub_user(&sifa.admin, worker.user_id)
        .await
        .unwrap_err();
    for err in [update, delete] {
        assert!(matches!(err, HekimError::Forbidden(Denial::CrossTenant)));
    }

    let listed = h.accounts.list_sub_users(&sifa.admin).await.unwrap();
    assert!(listed.iter().all(|u| u.hospital_id == sifa.hospital_id()));

    let missing = h
        .accounts
        .delete_sub_user(&sifa.admin, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(missing, HekimError::NotFound { .. }));
}

#[tokio::test]
async fn admin_cannot_demote_or_deactivate_itself() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let own_id = tenant.admin.user_id;

    for input in [
        UpdateUser {
            role: Some(Role::Worker),
            ..UpdateUser::default()
        },
        UpdateUser {
            is_active: Some(false),
            ..UpdateUser::default()
        },
        UpdateUser {
            role: Some(Role::Worker),
            is_active: Some(false),
            ..UpdateUser::default()
        },
    ] {
        let err = h
            .accounts
            .update_sub_user(&tenant.admin, own_id, input)
            .await
            .unwrap_err();
        assert!(matches!(err, HekimError::Forbidden(Denial::SelfTarget)));
    }

    let renamed = h
        .accounts
        .update_sub_user(
            &tenant.admin,
            own_id,
            UpdateUser {
                last_name: Some("Kaya".into()),
                role: Some(Role::Admin),
                is_active: Some(true),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.role, Role::Admin);
    assert!(renamed.is_active);

    h.accounts
        .login(LoginInput {
            identifier: tenant.registration.admin.email.clone(),
            password: ADMIN_PASSWORD.into(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn admin_cannot_delete_itself_but_can_delete_a_worker() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let worker = h.worker(&tenant, "w1").await;

    let err = h
        .accounts
        .delete_sub_user(&tenant.admin, tenant.admin.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, HekimError::Forbidden(Denial::SelfTarget)));

    h.accounts
        .delete_sub_user(&tenant.admin, worker.user_id)
        .await
        .unwrap();
    let err = h
        .accounts
        .login(LoginInput {
            identifier: "w1@staff.example".into(),
            password: "calisan-parola".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HekimError::AuthenticationFailed { .. }));
}
