//! Shared harness: every service wired over the in-memory engine.

#![allow(dead_code)]

use std::sync::Arc;

use hekim_auth::AuthConfig;
use hekim_auth::token::TokenService;
use hekim_cache::{CacheConfig, MemoryStore, ReferenceCache};
use hekim_core::access::{AuthContext, Role};
use hekim_core::clock::ManualClock;
use hekim_core::models::hospital::RegisterHospital;
use hekim_core::models::reference::{JobGroup, JobTitle, PolyclinicType};
use hekim_core::models::staff::CreateStaff;
use hekim_core::models::user::CreateSubUser;
use hekim_db::repository::{
    SurrealHospitalRepository, SurrealPolyclinicRepository, SurrealReferenceRepository,
    SurrealStaffRepository, SurrealUserRepository,
};
use hekim_db::{JobGroupSeed, JobTitleSeed, PolyclinicTypeSeed, ProvinceSeed, ReferenceSeed};
use hekim_service::{
    AccountService, CatalogService, HospitalService, PolyclinicService, Registration,
    StaffService,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

pub const ADMIN_PASSWORD: &str = "yonetici-parola";

pub type Catalog = CatalogService<SurrealReferenceRepository<Db>, MemoryStore>;

pub struct Harness {
    pub db: Surreal<Db>,
    pub clock: Arc<ManualClock>,
    pub store: MemoryStore,
    pub tokens: TokenService,
    pub catalog: Catalog,
    pub hospitals: HospitalService<
        SurrealHospitalRepository<Db>,
        SurrealUserRepository<Db>,
        SurrealReferenceRepository<Db>,
    >,
    pub accounts: AccountService<SurrealUserRepository<Db>>,
    pub staff: StaffService<
        SurrealStaffRepository<Db>,
        SurrealPolyclinicRepository<Db>,
        SurrealReferenceRepository<Db>,
        MemoryStore,
    >,
    pub polyclinics: PolyclinicService<
        SurrealPolyclinicRepository<Db>,
        SurrealStaffRepository<Db>,
        SurrealReferenceRepository<Db>,
        MemoryStore,
    >,
}

/// A registered hospital and its admin's context.
pub struct Tenant {
    pub registration: Registration,
    pub admin: AuthContext,
}

impl Tenant {
    pub fn hospital_id(&self) -> Uuid {
        self.registration.hospital.id
    }
}

fn seed() -> ReferenceSeed {
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

impl Harness {
    pub async fn new() -> Self {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        hekim_db::run_migrations(&db).await.unwrap();
        seed().apply(&db).await.unwrap();

        let clock = Arc::new(ManualClock::starting_now());
        let store = MemoryStore::new(clock.clone());
        let config = AuthConfig {
            jwt_secret: "service-test-secret".into(),
            ..AuthConfig::default()
        };
        let tokens = TokenService::with_clock(&config, clock.clone());

        let refs = SurrealReferenceRepository::new(db.clone());
        let users = SurrealUserRepository::new(db.clone());
        let staff_repo = SurrealStaffRepository::new(db.clone());
        let polyclinic_repo = SurrealPolyclinicRepository::new(db.clone());
        let catalog = CatalogService::new(
            refs.clone(),
            ReferenceCache::new(store.clone(), CacheConfig::default()),
        );

        Self {
            hospitals: HospitalService::new(
                SurrealHospitalRepository::new(db.clone()),
                users.clone(),
                refs,
                tokens.clone(),
                config.min_password_length,
            ),
            accounts: AccountService::new(users, tokens.clone(), config.min_password_length),
            staff: StaffService::new(staff_repo.clone(), polyclinic_repo.clone(), catalog.clone()),
            polyclinics: PolyclinicService::new(polyclinic_repo, staff_repo, catalog.clone()),
            catalog,
            db,
            clock,
            store,
            tokens,
        }
    }

    /// İstanbul and its Kadıköy district.
    pub async fn istanbul(&self) -> (Uuid, Uuid) {
        let province = self
            .catalog
            .provinces()
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.name == "İstanbul")
            .unwrap();
        let district = self
            .catalog
            .districts(province.id)
            .await
            .unwrap()
            .into_iter()
            .find(|d| d.name == "Kadıköy")
            .unwrap();
        (province.id, district.id)
    }

    pub async fn registration(&self, tag: &str) -> RegisterHospital {
        let (province_id, district_id) = self.istanbul().await;
        RegisterHospital {
            hospital_name: format!("Hastane {tag}"),
            tax_id: format!("tax-{tag}"),
            hospital_email: format!("info@{tag}.example"),
            hospital_phone: format!("0212{tag}"),
            province_id,
            district_id,
            address_detail: "Bağdat Caddesi No:1".into(),
            admin_first_name: "Ayşe".into(),
            admin_last_name: "Yılmaz".into(),
            admin_national_id: format!("nid-{tag}"),
            admin_email: format!("admin@{tag}.example"),
            admin_phone: format!("0555{tag}"),
            admin_password: ADMIN_PASSWORD.into(),
        }
    }

    pub async fn register(&self, tag: &str) -> Tenant {
        let registration = self
            .hospitals
            .register(self.registration(tag).await)
            .await
            .unwrap();
        let admin = self.context(&registration.token);
        Tenant {
            registration,
            admin,
        }
    }

    pub fn context(&self, token: &str) -> AuthContext {
        self.tokens.verify(token).unwrap().to_context().unwrap()
    }

    pub fn sub_user_input(tag: &str, role: Role) -> CreateSubUser {
        CreateSubUser {
            first_name: "Mehmet".into(),
            last_name: format!("Kaya {tag}"),
            national_id: format!("sub-nid-{tag}"),
            email: format!("{tag}@staff.example"),
            phone: format!("0532{tag}"),
            password: "calisan-parola".into(),
            role,
        }
    }

    /// Create a worker in the tenant and return its context.
    pub async fn worker(&self, tenant: &Tenant, tag: &str) -> AuthContext {
        let user = self
            .accounts
            .create_sub_user(&tenant.admin, Self::sub_user_input(tag, Role::Worker))
            .await
            .unwrap();
        let issued = self
            .tokens
            .issue(user.id, user.hospital_id, user.role, &user.email)
            .unwrap();
        self.context(&issued.token)
    }

    /// The "Doktor" group with its chief physician and specialist titles.
    pub async fn doctor_titles(&self) -> (JobGroup, JobTitle, JobTitle) {
        let group = self
            .catalog
            .job_groups()
            .await
            .unwrap()
            .into_iter()
            .find(|g| g.name == "Doktor")
            .unwrap();
        let titles = self.catalog.job_titles(group.id).await.unwrap();
        let chief = titles.iter().find(|t| t.is_unique).unwrap().clone();
        let specialist = titles.iter().find(|t| !t.is_unique).unwrap().clone();
        (group, chief, specialist)
    }

    pub async fn polyclinic_type(&self, name: &str) -> PolyclinicType {
        self.catalog
            .polyclinic_types()
            .await
            .unwrap()
            .into_iter()
            .find(|t| t.name == name)
            .unwrap()
    }
}

pub fn staff_input(tag: &str, group: &JobGroup, title: &JobTitle) -> CreateStaff {
    CreateStaff {
        first_name: "Zeynep".into(),
        last_name: format!("Demir {tag}"),
        national_id: format!("staff-nid-{tag}"),
        phone: format!("0533{tag}"),
        job_group_id: group.id,
        job_title_id: title.id,
        polyclinic_id: None,
        work_days: vec![1, 2, 3],
    }
}
