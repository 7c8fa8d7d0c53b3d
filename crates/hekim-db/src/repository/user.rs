//! SurrealDB implementation of [`UserRepository`].
//!
//! Passwords arrive already hashed; hashing lives in `hekim-auth` so that
//! it can run off the async executor.

use chrono::{DateTime, Utc};
use hekim_core::access::Role;
use hekim_core::error::HekimResult;
use hekim_core::models::user::{CreateUser, UpdateUser, User};
use hekim_core::repository::UserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, exclude_clause};
use crate::error::{DbError, parse_opt_uuid, parse_uuid};

/// DB-side row struct for writes, where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    hospital_id: String,
    first_name: String,
    last_name: String,
    national_id: String,
    email: String,
    phone: String,
    password_hash: String,
    role: String,
    created_by: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    hospital_id: String,
    first_name: String,
    last_name: String,
    national_id: String,
    email: String,
    phone: String,
    password_hash: String,
    role: String,
    created_by: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const USER_SELECT: &str = "SELECT meta::id(id) AS record_id, * FROM user";

fn parse_role(s: &str) -> Result<Role, DbError> {
    Role::parse(s).ok_or_else(|| DbError::InvalidRecord(format!("unknown role: {s}")))
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            hospital_id: parse_uuid("hospital", &self.hospital_id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            national_id: self.national_id,
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            created_by: parse_opt_uuid("created_by", self.created_by.as_deref())?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        Ok(User {
            id: parse_uuid("user", &self.record_id)?,
            hospital_id: parse_uuid("hospital", &self.hospital_id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            national_id: self.national_id,
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            created_by: parse_opt_uuid("created_by", self.created_by.as_deref())?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn find_one(&self, field: &'static str, value: &str) -> HekimResult<Option<User>> {
        let query = format!("{USER_SELECT} WHERE {field} = $value LIMIT 1");
        let mut result = self
            .db
            .query(query)
            .bind(("value", value.to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_user()?)),
            None => Ok(None),
        }
    }

    async fn exists_by(
        &self,
        field: &'static str,
        value: &str,
        exclude: Option<Uuid>,
    ) -> HekimResult<bool> {
        let query = format!(
            "SELECT count() AS total FROM user WHERE {field} = $value{} GROUP ALL",
            exclude_clause(exclude)
        );
        let mut builder = self.db.query(query).bind(("value", value.to_string()));
        if let Some(exclude) = exclude {
            builder = builder.bind(("exclude", exclude.to_string()));
        }
        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(CountRow::total(rows) > 0)
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, hospital_id: Uuid, input: CreateUser) -> HekimResult<User> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 hospital_id = $hospital_id, \
                 first_name = $first_name, last_name = $last_name, \
                 national_id = $national_id, email = $email, phone = $phone, \
                 password_hash = $password_hash, role = $role, \
                 created_by = $created_by, is_active = true",
            )
            .bind(("id", id.to_string()))
            .bind(("hospital_id", hospital_id.to_string()))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("national_id", input.national_id))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("password_hash", input.password_hash))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("created_by", input.created_by.map(|u| u.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("user", id))?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HekimResult<User> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('user', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("user", id))?;

        Ok(row.try_into_user()?)
    }

    async fn find_by_email(&self, email: &str) -> HekimResult<Option<User>> {
        self.find_one("email", email).await
    }

    async fn find_by_phone(&self, phone: &str) -> HekimResult<Option<User>> {
        self.find_one("phone", phone).await
    }

    async fn exists_by_national_id(
        &self,
        national_id: &str,
        exclude: Option<Uuid>,
    ) -> HekimResult<bool> {
        self.exists_by("national_id", national_id, exclude).await
    }

    async fn exists_by_email(&self, email: &str, exclude: Option<Uuid>) -> HekimResult<bool> {
        self.exists_by("email", email, exclude).await
    }

    async fn exists_by_phone(&self, phone: &str, exclude: Option<Uuid>) -> HekimResult<bool> {
        self.exists_by("phone", phone, exclude).await
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> HekimResult<User> {
        let mut sets = Vec::new();
        if input.first_name.is_some() {
            sets.push("first_name = $first_name");
        }
        if input.last_name.is_some() {
            sets.push("last_name = $last_name");
        }
        if input.national_id.is_some() {
            sets.push("national_id = $national_id");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id.to_string()));
        if let Some(first_name) = input.first_name {
            builder = builder.bind(("first_name", first_name));
        }
        if let Some(last_name) = input.last_name {
            builder = builder.bind(("last_name", last_name));
        }
        if let Some(national_id) = input.national_id {
            builder = builder.bind(("national_id", national_id));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(role) = input.role {
            builder = builder.bind(("role", role.as_str().to_string()));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("user", id))?;

        Ok(row.into_user(id)?)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: String) -> HekimResult<()> {
        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 password_hash = $password_hash, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("user", id).into());
        }
        Ok(())
    }

    async fn deactivate(&self, id: Uuid) -> HekimResult<()> {
        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 is_active = false, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("user", id).into());
        }
        Ok(())
    }

    async fn list_by_hospital(&self, hospital_id: Uuid) -> HekimResult<Vec<User>> {
        let mut result = self
            .db
            .query(format!(
                "{USER_SELECT} WHERE hospital_id = $hospital_id \
                 ORDER BY first_name ASC, last_name ASC"
            ))
            .bind(("hospital_id", hospital_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|r| r.try_into_user().map_err(Into::into))
            .collect()
    }
}
