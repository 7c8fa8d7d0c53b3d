//! Shared application state.
//!
//! Every service is wired once at startup over the SurrealDB client and the
//! chosen ephemeral backend, then shared by reference across handlers.

use std::sync::Arc;

use hekim_auth::{AuthConfig, AuthGate, LogNotificationSender, PasswordResetService, TokenService};
use hekim_cache::{CacheConfig, EphemeralBackend, ReferenceCache};
use hekim_core::clock::Clock;
use hekim_db::repository::{
    SurrealHospitalRepository, SurrealPolyclinicRepository, SurrealReferenceRepository,
    SurrealStaffRepository, SurrealUserRepository,
};
use hekim_service::{
    AccountService, CatalogService, HospitalService, PolyclinicService, StaffService,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

type Users = SurrealUserRepository<Any>;
type References = SurrealReferenceRepository<Any>;
type StaffRows = SurrealStaffRepository<Any>;
type Polyclinics = SurrealPolyclinicRepository<Any>;

pub type Catalog = CatalogService<References, EphemeralBackend>;
pub type Hospitals = HospitalService<SurrealHospitalRepository<Any>, Users, References>;
pub type Accounts = AccountService<Users>;
pub type Staff = StaffService<StaffRows, Polyclinics, References, EphemeralBackend>;
pub type PolyclinicOps = PolyclinicService<Polyclinics, StaffRows, References, EphemeralBackend>;
pub type Resets = PasswordResetService<Users, EphemeralBackend, LogNotificationSender>;

/// Shared application state.
pub struct AppState {
    gate: Arc<AuthGate>,
    catalog: Arc<Catalog>,
    hospitals: Arc<Hospitals>,
    accounts: Arc<Accounts>,
    staff: Arc<Staff>,
    polyclinics: Arc<PolyclinicOps>,
    resets: Arc<Resets>,
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
            catalog: Arc::clone(&self.catalog),
            hospitals: Arc::clone(&self.hospitals),
            accounts: Arc::clone(&self.accounts),
            staff: Arc::clone(&self.staff),
            polyclinics: Arc::clone(&self.polyclinics),
            resets: Arc::clone(&self.resets),
        }
    }
}

impl AppState {
    /// Wire every service over one database client and one ephemeral store.
    pub fn build(
        db: Surreal<Any>,
        store: EphemeralBackend,
        auth: AuthConfig,
        cache: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = TokenService::with_clock(&auth, clock);
        let users = SurrealUserRepository::new(db.clone());
        let refs = SurrealReferenceRepository::new(db.clone());
        let staff_rows = SurrealStaffRepository::new(db.clone());
        let polyclinics = SurrealPolyclinicRepository::new(db.clone());

        let catalog = CatalogService::new(refs.clone(), ReferenceCache::new(store.clone(), cache));

        Self {
            gate: Arc::new(AuthGate::new(tokens.clone())),
            hospitals: Arc::new(HospitalService::new(
                SurrealHospitalRepository::new(db),
                users.clone(),
                refs,
                tokens.clone(),
                auth.min_password_length,
            )),
            accounts: Arc::new(AccountService::new(
                users.clone(),
                tokens,
                auth.min_password_length,
            )),
            staff: Arc::new(StaffService::new(
                staff_rows.clone(),
                polyclinics.clone(),
                catalog.clone(),
            )),
            polyclinics: Arc::new(PolyclinicService::new(
                polyclinics,
                staff_rows,
                catalog.clone(),
            )),
            resets: Arc::new(PasswordResetService::new(
                users,
                store,
                LogNotificationSender,
                auth,
            )),
            catalog: Arc::new(catalog),
        }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn hospitals(&self) -> &Hospitals {
        &self.hospitals
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn staff(&self) -> &Staff {
        &self.staff
    }

    pub fn polyclinics(&self) -> &PolyclinicOps {
        &self.polyclinics
    }

    pub fn resets(&self) -> &Resets {
        &self.resets
    }
}
