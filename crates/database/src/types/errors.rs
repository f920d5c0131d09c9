//! Error types for the database layer

use sqlx::error::ErrorKind;
use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    /// A referenced row does not exist (foreign key or derived NOT NULL column).
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => Self::NotFound("row not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => Self::Duplicate(db_err.message().to_string()),
                ErrorKind::ForeignKeyViolation | ErrorKind::NotNullViolation => {
                    Self::InvalidReference(db_err.message().to_string())
                }
                _ => Self::QueryError(error.to_string()),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::ConnectionError(error.to_string())
            }
            _ => Self::QueryError(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<uuid::Error> for DatabaseError {
    fn from(error: uuid::Error) -> Self {
        Self::Serialization(format!("malformed stored identifier: {error}"))
    }
}
