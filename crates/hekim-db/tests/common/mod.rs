//! Shared fixtures for the repository tests.

#![allow(dead_code)]

use hekim_core::access::Role;
use hekim_core::models::hospital::CreateHospital;
use hekim_core::models::reference::{JobGroup, JobTitle};
use hekim_core::models::user::CreateUser;
use hekim_core::repository::ReferenceRepository;
use hekim_db::repository::SurrealReferenceRepository;
use hekim_db::{JobGroupSeed, JobTitleSeed, PolyclinicTypeSeed, ProvinceSeed, ReferenceSeed};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

pub async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hekim_db::run_migrations(&db).await.unwrap();
    db
}

pub fn seed() -> ReferenceSeed {
    ReferenceSeed {
        provinces: vec![
            ProvinceSeed {
                name: "İstanbul".into(),
                districts: vec!["Kadıköy".into(), "Beşiktaş".into()],
            },
            ProvinceSeed {
                name: "Ankara".into(),
                districts: vec!["Çankaya".into()],
            },
        ],
        job_groups: vec![
            JobGroupSeed {
                name: "Doktor".into(),
                titles: vec![
                    JobTitleSeed {
                        name: "Başhekim".into(),
                        is_unique: true,
                    },
                    JobTitleSeed {
                        name: "Uzman Doktor".into(),
                        is_unique: false,
                    },
                ],
            },
            JobGroupSeed {
                name: "Hemşire".into(),
                titles: vec![JobTitleSeed {
                    name: "Hemşire".into(),
                    is_unique: false,
                }],
            },
        ],
        polyclinic_types: vec![
            PolyclinicTypeSeed {
                name: "Kardiyoloji".into(),
                description: "Kalp ve damar hastalıkları".into(),
            },
            PolyclinicTypeSeed {
                name: "Dahiliye".into(),
                description: String::new(),
            },
        ],
    }
}

pub async fn seeded() -> Surreal<Db> {
    let db = setup().await;
    assert!(seed().apply(&db).await.unwrap());
    db
}

/// The "Doktor" group with its titles, chief physician first.
pub async fn doctor_titles(db: &Surreal<Db>) -> (JobGroup, JobTitle, JobTitle) {
    let refs = SurrealReferenceRepository::new(db.clone());
    let group = refs
        .job_groups()
        .await
        .unwrap()
        .into_iter()
        .find(|g| g.name == "Doktor")
        .unwrap();
    let titles = refs.job_titles(group.id).await.unwrap();
    let chief = titles.iter().find(|t| t.is_unique).unwrap().clone();
    let specialist = titles.iter().find(|t| !t.is_unique).unwrap().clone();
    (group, chief, specialist)
}

pub fn hospital_input(tag: &str) -> CreateHospital {
    CreateHospital {
        name: format!("Hospital {tag}"),
        tax_id: format!("tax-{tag}"),
        email: format!("info@{tag}.example"),
        phone: format!("0212{tag}"),
        province_id: Uuid::new_v4(),
        district_id: Uuid::new_v4(),
        address_detail: "Caddesi No:1".into(),
    }
}

pub fn user_input(tag: &str, role: Role) -> CreateUser {
    CreateUser {
        first_name: "Ayşe".into(),
        last_name: format!("User {tag}"),
        national_id: format!("nid-{tag}"),
        email: format!("{tag}@example.com"),
        phone: format!("0555{tag}"),
        password_hash: "$argon2id$placeholder".into(),
        role,
        created_by: None,
    }
}
