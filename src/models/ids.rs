use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// Width of every primary identifier in the schema.
pub const RECORD_ID_LEN: usize = 8;

/// Fixed-width opaque identifier (patients, clinicians, insurers, medications).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Result<Self, DatabaseError> {
        let value = value.into();
        if value.chars().count() != RECORD_ID_LEN {
            return Err(DatabaseError::validation(
                "record id",
                format!("'{value}' must be exactly {RECORD_ID_LEN} characters"),
            ));
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DatabaseError::validation(
                "record id",
                format!("'{value}' contains whitespace"),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = DatabaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl ToSql for RecordId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for RecordId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = String::column_result(value)?;
        RecordId::new(text).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Required text field: trimmed, must not be empty.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), DatabaseError> {
    if value.trim().is_empty() {
        return Err(DatabaseError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Optional text field: absent is fine, present-but-blank is not.
pub(crate) fn optional_text(field: &str, value: Option<&str>) -> Result<(), DatabaseError> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_eight_character_codes() {
        let id = RecordId::new("00000001").unwrap();
        assert_eq!(id.as_str(), "00000001");
        assert_eq!(id.to_string(), "00000001");
    }

    #[test]
    fn rejects_wrong_width() {
        assert!(matches!(
            RecordId::new("0001"),
            Err(DatabaseError::Validation { .. })
        ));
        assert!(RecordId::new("000000001").is_err());
        assert!(RecordId::new("").is_err());
    }

    #[test]
    fn rejects_embedded_whitespace() {
        assert!(RecordId::new("0000 001").is_err());
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: RecordId = serde_json::from_str("\"ABCDEFGH\"").unwrap();
        assert_eq!(ok.as_str(), "ABCDEFGH");
        let bad: Result<RecordId, _> = serde_json::from_str("\"ABC\"");
        assert!(bad.is_err());
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_text("first name", "  ").is_err());
        assert!(require_text("first name", "Ann").is_ok());
        assert!(optional_text("address", None).is_ok());
        assert!(optional_text("address", Some("")).is_err());
    }
}
