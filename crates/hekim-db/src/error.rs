//! Database-specific error types and conversions.

use hekim_core::error::HekimError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A unique index rejected the write.
    #[error("Unique index {index} violated on {entity}")]
    UniqueViolation { entity: String, index: String },

    #[error("Invalid stored value: {0}")]
    InvalidRecord(String),
}

impl DbError {
    /// Classify a statement error, recognising unique index violations
    /// (`Database index `idx_x` already contains ...`).
    pub(crate) fn from_statement(entity: &str, err: impl ToString) -> Self {
        let msg = err.to_string();
        if msg.contains("already contains") {
            let index = msg
                .split('`')
                .nth(1)
                .unwrap_or("unique index")
                .to_string();
            return DbError::UniqueViolation {
                entity: entity.into(),
                index,
            };
        }
        DbError::Query(msg)
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<uuid::Uuid, DbError> {
    uuid::Uuid::parse_str(value)
        .map_err(|e| DbError::InvalidRecord(format!("invalid {field} UUID: {e}")))
}

pub(crate) fn parse_opt_uuid(field: &str, value: Option<&str>) -> Result<Option<uuid::Uuid>, DbError> {
    value.map(|v| parse_uuid(field, v)).transpose()
}

impl From<DbError> for HekimError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => HekimError::NotFound { entity, id },
            DbError::UniqueViolation { entity, index } => HekimError::Conflict {
                entity,
                constraint: index,
            },
            other => HekimError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_index_message_becomes_conflict() {
        let err = DbError::from_statement(
            "hospital",
            "Database index `idx_hospital_tax_id` already contains '1111111111', \
             with record `hospital:abc`",
        );
        match HekimError::from(err) {
            HekimError::Conflict { entity, constraint } => {
                assert_eq!(entity, "hospital");
                assert_eq!(constraint, "idx_hospital_tax_id");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn other_statement_errors_are_database_errors() {
        let err = DbError::from_statement("user", "Found NONE for field `email`");
        assert!(matches!(HekimError::from(err), HekimError::Database(_)));
    }
}
