//! Explicit database session.
//!
//! A `Session` knows where the store lives and hands out one connection
//! per unit of work. Connections are owned by the caller's scope and are
//! closed when dropped, including on early `?` returns.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::{open_database, DatabaseError};
use crate::config;

#[derive(Debug, Clone)]
pub struct Session {
    db_path: PathBuf,
}

impl Session {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Session for the configured database location.
    pub fn from_config() -> Self {
        Self::new(config::database_path())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection (migrations applied, foreign keys on).
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        open_database(&self.db_path)
    }

    /// Run one operation on a freshly opened connection.
    ///
    /// The connection lives only for the duration of `op`.
    pub fn with_connection<T, E>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        let conn = self.open_db()?;
        op(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{get_insurance, insert_insurance};
    use crate::models::{Insurance, RecordId};

    #[test]
    fn session_persists_between_connections() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().join("hospital.db"));
        let id = RecordId::new("00000001").unwrap();

        session
            .with_connection(|conn| {
                insert_insurance(
                    conn,
                    &Insurance::new(id.clone(), "HealthPlus", None, None).unwrap(),
                )
            })
            .unwrap();

        let found = session
            .with_connection(|conn| get_insurance(conn, &id))
            .unwrap();
        assert_eq!(found.unwrap().insurance_name, "HealthPlus");
    }

    #[test]
    fn session_propagates_operation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().join("hospital.db"));

        let result: Result<(), DatabaseError> = session.with_connection(|_| {
            Err(DatabaseError::NotFound {
                entity_type: "Patient".into(),
                id: "00000009".into(),
            })
        });
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn session_reports_db_path() {
        let session = Session::new("/tmp/somewhere/hospital.db");
        assert!(session.db_path().ends_with("hospital.db"));
    }
}
