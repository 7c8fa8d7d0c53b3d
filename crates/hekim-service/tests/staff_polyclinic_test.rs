mod common;

use common::{Harness, staff_input};
use hekim_core::error::{Denial, HekimError};
use hekim_core::models::polyclinic::{CreatePolyclinic, UpdatePolyclinic};
use hekim_core::models::staff::{StaffFilter, UpdateStaff};
use hekim_core::repository::Pagination;
use uuid::Uuid;

fn violated_fields(err: HekimError) -> Vec<String> {
    match err {
        HekimError::Validation(list) => list.into_iter().map(|v| v.field).collect(),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

fn clinic(type_id: Uuid, room: i32) -> CreatePolyclinic {
    CreatePolyclinic {
        polyclinic_type_id: type_id,
        floor: 2,
        room_number: room,
    }
}

#[tokio::test]
async fn chief_physician_is_unique_per_hospital() {
    let h = Harness::new().await;
    let sifa = h.register("sifa").await;
    let deva = h.register("deva").await;
    let (group, chief, _) = h.doctor_titles().await;

    h.staff
        .create(&sifa.admin, staff_input("c1", &group, &chief))
        .await
        .unwrap();

    let err = h
        .staff
        .create(&sifa.admin, staff_input("c2", &group, &chief))
        .await
        .unwrap_err();
    assert_eq!(violated_fields(err), ["job_title_id"]);

    h.staff
        .create(&deva.admin, staff_input("c3", &group, &chief))
        .await
        .unwrap();
}

#[tokio::test]
async fn chief_physician_slot_frees_up_after_deactivation() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let (group, chief, _) = h.doctor_titles().await;

    let first = h
        .staff
        .create(&tenant.admin, staff_input("c1", &group, &chief))
        .await
        .unwrap();
    h.staff.delete(&tenant.admin, first.id).await.unwrap();

    h.staff
        .create(&tenant.admin, staff_input("c2", &group, &chief))
        .await
        .unwrap();
}

#[tokio::test]
async fn worker_reads_but_cannot_write_staff() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let worker = h.worker(&tenant, "w1").await;
    let (group, _, specialist) = h.doctor_titles().await;

    let err = h
        .staff
        .create(&worker, staff_input("s1", &group, &specialist))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HekimError::Forbidden(Denial::InsufficientPermission { .. })
    ));

    let staff = h
        .staff
        .create(&tenant.admin, staff_input("s1", &group, &specialist))
        .await
        .unwrap();
    let read = h.staff.get(&worker, staff.id).await.unwrap();
    assert_eq!(read.id, staff.id);
    let page = h
        .staff
        .list(&worker, &StaffFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn staff_of_another_hospital_is_forbidden() {
    let h = Harness::new().await;
    let sifa = h.register("sifa").await;
    let deva = h.register("deva").await;
    let (group, _, specialist) = h.doctor_titles().await;

    let staff = h
        .staff
        .create(&deva.admin, staff_input("s1", &group, &specialist))
        .await
        .unwrap();

    let get = h.staff.get(&sifa.admin, staff.id).await.unwrap_err();
    let delete = h.staff.delete(&sifa.admin, staff.id).await.unwrap_err();
    for err in [get, delete] {
        assert!(matches!(err, HekimError::Forbidden(Denial::CrossTenant)));
    }

    let page = h
        .staff
        .list(&sifa.admin, &StaffFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.pagination.total_records, 0);

    let missing = h.staff.get(&sifa.admin, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(missing, HekimError::NotFound { .. }));
}

#[tokio::test]
async fn staff_submission_collects_every_violation() {
    let h = Harness::new().await;
    let sifa = h.register("sifa").await;
    let deva = h.register("deva").await;
    let (group, _, specialist) = h.doctor_titles().await;
    let cardiology = h.polyclinic_type("Kardiyoloji").await;
    let foreign = h
        .polyclinics
        .add(&deva.admin, clinic(cardiology.id, 101))
        .await
        .unwrap();

    h.staff
        .create(&sifa.admin, staff_input("s1", &group, &specialist))
        .await
        .unwrap();

    let mut input = staff_input("s2", &group, &specialist);
    input.national_id = "staff-nid-s1".into();
    input.phone = "0533s1".into();
    input.polyclinic_id = Some(foreign.id);
    input.work_days = vec![];

    let err = h.staff.create(&sifa.admin, input).await.unwrap_err();
    assert_eq!(
        violated_fields(err),
        ["tc", "phone", "polyclinic_id", "work_days"]
    );
}

#[tokio::test]
async fn job_title_must_belong_to_the_group() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let (_, _, specialist) = h.doctor_titles().await;
    let nurses = h
        .catalog
        .job_groups()
        .await
        .unwrap()
        .into_iter()
        .find(|g| g.name == "Hemşire")
        .unwrap();

    let err = h
        .staff
        .create(&tenant.admin, staff_input("s1", &nurses, &specialist))
        .await
        .unwrap_err();
    assert_eq!(violated_fields(err), ["job_title_id"]);
}

#[tokio::test]
async fn staff_update_keeps_own_phone_and_title() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let (group, chief, _) = h.doctor_titles().await;

    let staff = h
        .staff
        .create(&tenant.admin, staff_input("c1", &group, &chief))
        .await
        .unwrap();

    let updated = h
        .staff
        .update(
            &tenant.admin,
            staff.id,
            UpdateStaff {
                first_name: "Elif".into(),
                last_name: staff.last_name.clone(),
                phone: staff.phone.clone(),
                job_group_id: group.id,
                job_title_id: chief.id,
                polyclinic_id: None,
                work_days: vec![6, 7],
                is_active: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name, "Elif");
    assert_eq!(updated.work_days, vec![6, 7]);
}

#[tokio::test]
async fn listing_resolves_names_and_paginates() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let (group, chief, specialist) = h.doctor_titles().await;
    let cardiology = h.polyclinic_type("Kardiyoloji").await;
    let clinic = h
        .polyclinics
        .add(&tenant.admin, clinic(cardiology.id, 101))
        .await
        .unwrap();

    let mut first = staff_input("a", &group, &chief);
    first.first_name = "Ahmet".into();
    first.polyclinic_id = Some(clinic.id);
    first.work_days = vec![1, 3, 5];
    h.staff.create(&tenant.admin, first).await.unwrap();
    for tag in ["b", "c"] {
        let mut input = staff_input(tag, &group, &specialist);
        input.first_name = format!("Zehra {tag}");
        h.staff.create(&tenant.admin, input).await.unwrap();
    }

    let page = h
        .staff
        .list(&tenant.admin, &StaffFilter::default(), Pagination::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total_records, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(page.pagination.has_next);
    assert!(!page.pagination.has_prev);

    let ahmet = &page.items[0];
    assert_eq!(ahmet.first_name, "Ahmet");
    assert_eq!(ahmet.job_group_name, "Doktor");
    assert_eq!(ahmet.job_title_name, "Başhekim");
    assert_eq!(ahmet.polyclinic_type_name.as_deref(), Some("Kardiyoloji"));
    assert_eq!(ahmet.work_days_text, "Pazartesi, Çarşamba, Cuma");
    assert_eq!(page.items[1].polyclinic_type_name, None);

    let filtered = h
        .staff
        .list(
            &tenant.admin,
            &StaffFilter {
                first_name: Some("zehra".into()),
                ..StaffFilter::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(filtered.items.len(), 2);
    assert!(filtered.items.iter().all(|s| s.job_title_name == "Uzman Doktor"));
}

#[tokio::test]
async fn one_active_polyclinic_per_type() {
    let h = Harness::new().await;
    let sifa = h.register("sifa").await;
    let deva = h.register("deva").await;
    let cardiology = h.polyclinic_type("Kardiyoloji").await;

    let first = h
        .polyclinics
        .add(&sifa.admin, clinic(cardiology.id, 101))
        .await
        .unwrap();
    let err = h
        .polyclinics
        .add(&sifa.admin, clinic(cardiology.id, 102))
        .await
        .unwrap_err();
    assert_eq!(violated_fields(err), ["polyclinic_type_id"]);

    // Another hospital may open the same type.
    h.polyclinics
        .add(&deva.admin, clinic(cardiology.id, 101))
        .await
        .unwrap();

    // Once closed, the type can be opened again, but not re-activated twice.
    h.polyclinics.delete(&sifa.admin, first.id).await.unwrap();
    h.polyclinics
        .add(&sifa.admin, clinic(cardiology.id, 103))
        .await
        .unwrap();
    let err = h
        .polyclinics
        .update(
            &sifa.admin,
            first.id,
            UpdatePolyclinic {
                floor: 2,
                room_number: 101,
                is_active: true,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(violated_fields(err), ["polyclinic_type_id"]);
}

#[tokio::test]
async fn unknown_polyclinic_type_is_rejected() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let err = h
        .polyclinics
        .add(&tenant.admin, clinic(Uuid::new_v4(), 1))
        .await
        .unwrap_err();
    assert_eq!(violated_fields(err), ["polyclinic_type_id"]);
}

#[tokio::test]
async fn foreign_polyclinic_is_forbidden() {
    let h = Harness::new().await;
    let sifa = h.register("sifa").await;
    let deva = h.register("deva").await;
    let cardiology = h.polyclinic_type("Kardiyoloji").await;
    let clinic = h
        .polyclinics
        .add(&deva.admin, clinic(cardiology.id, 101))
        .await
        .unwrap();

    let err = h
        .polyclinics
        .update(
            &sifa.admin,
            clinic.id,
            UpdatePolyclinic {
                floor: 9,
                room_number: 9,
                is_active: true,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HekimError::Forbidden(Denial::CrossTenant)));
}

#[tokio::test]
async fn summaries_count_active_staff_by_group() {
    let h = Harness::new().await;
    let tenant = h.register("sifa").await;
    let worker = h.worker(&tenant, "w1").await;
    let (group, chief, specialist) = h.doctor_titles().await;
    let cardiology = h.polyclinic_type("Kardiyoloji").await;
    let internal = h.polyclinic_type("Dahiliye").await;

    let cardio = h
        .polyclinics
        .add(&tenant.admin, clinic(cardiology.id, 101))
        .await
        .unwrap();
    h.polyclinics
        .add(&tenant.admin, clinic(internal.id, 102))
        .await
        .unwrap();

    let mut ids = Vec::new();
    for (tag, title) in [("a", &chief), ("b", &specialist), ("c", &specialist)] {
        let mut input = staff_input(tag, &group, title);
        input.polyclinic_id = Some(cardio.id);
        ids.push(h.staff.create(&tenant.admin, input).await.unwrap().id);
    }
    h.staff.delete(&tenant.admin, ids[2]).await.unwrap();

    let summaries = h.polyclinics.summaries(&worker).await.unwrap();
    let names: Vec<_> = summaries
        .iter()
        .map(|s| s.polyclinic_type_name.as_str())
        .collect();
    assert_eq!(names, ["Dahiliye", "Kardiyoloji"]);

    assert_eq!(summaries[0].total_staff_count, 0);
    assert!(summaries[0].staff_by_job_group.is_empty());
    assert_eq!(summaries[1].total_staff_count, 2);
    assert_eq!(summaries[1].staff_by_job_group[0].job_group_name, "Doktor");
    assert_eq!(summaries[1].staff_by_job_group[0].count, 2);
}
