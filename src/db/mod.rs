pub mod repository;
pub mod session;
pub mod sqlite;

pub use repository::*;
pub use session::*;
pub use sqlite::*;

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Ambiguous {entity_type} name '{name}': {matches} rows match")]
    AmbiguousName {
        entity_type: String,
        name: String,
        matches: usize,
    },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl DatabaseError {
    /// Classify a failed write: duplicate keys, missing foreign keys and
    /// restricted deletes become `ConstraintViolation`, everything else
    /// stays a store failure.
    pub fn from_write(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.code == ErrorCode::ConstraintViolation =>
            {
                DatabaseError::ConstraintViolation(
                    msg.clone().unwrap_or_else(|| code.to_string()),
                )
            }
            _ => DatabaseError::Sqlite(err),
        }
    }

    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        DatabaseError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(entity_type: &str, id: impl Into<String>) -> Self {
        DatabaseError::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DatabaseError::ConstraintViolation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }
}
