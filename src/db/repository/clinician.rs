use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_clinician(conn: &Connection, clinician: &Clinician) -> Result<(), DatabaseError> {
    clinician.validate()?;
    conn.execute(
        "INSERT INTO HealthCareProfessionals (HCPID, FirstName, LastName, ContactNumber, Department)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            clinician.hcp_id,
            clinician.first_name,
            clinician.last_name,
            clinician.contact_number,
            clinician.department,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    tracing::debug!(hcp_id = %clinician.hcp_id, "Clinician inserted");
    Ok(())
}

pub fn get_clinician(conn: &Connection, hcp_id: &RecordId) -> Result<Option<Clinician>, DatabaseError> {
    let clinician = conn
        .query_row(
            "SELECT HCPID, FirstName, LastName, ContactNumber, Department
             FROM HealthCareProfessionals WHERE HCPID = ?1",
            params![hcp_id],
            clinician_from_row,
        )
        .optional()?;
    Ok(clinician)
}

pub fn get_all_clinicians(conn: &Connection) -> Result<Vec<Clinician>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT HCPID, FirstName, LastName, ContactNumber, Department
         FROM HealthCareProfessionals ORDER BY HCPID",
    )?;
    let rows = stmt.query_map([], clinician_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn update_clinician(conn: &Connection, clinician: &Clinician) -> Result<(), DatabaseError> {
    clinician.validate()?;
    let affected = conn
        .execute(
            "UPDATE HealthCareProfessionals
             SET FirstName = ?1, LastName = ?2, ContactNumber = ?3, Department = ?4
             WHERE HCPID = ?5",
            params![
                clinician.first_name,
                clinician.last_name,
                clinician.contact_number,
                clinician.department,
                clinician.hcp_id,
            ],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found("Clinician", clinician.hcp_id.as_str()));
    }
    tracing::debug!(hcp_id = %clinician.hcp_id, "Clinician updated");
    Ok(())
}

/// Fails with `ConstraintViolation` while patients, visits or department
/// rows still reference the clinician.
pub fn delete_clinician(conn: &Connection, hcp_id: &RecordId) -> Result<(), DatabaseError> {
    let affected = conn
        .execute("DELETE FROM HealthCareProfessionals WHERE HCPID = ?1", params![hcp_id])
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found("Clinician", hcp_id.as_str()));
    }
    tracing::info!(hcp_id = %hcp_id, "Clinician deleted");
    Ok(())
}

pub(crate) fn clinician_from_row(row: &rusqlite::Row<'_>) -> Result<Clinician, rusqlite::Error> {
    Ok(Clinician {
        hcp_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        contact_number: row.get(3)?,
        department: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn make_clinician(hcp_id: &str) -> Clinician {
        Clinician::new(
            RecordId::new(hcp_id).unwrap(),
            "James",
            "Wilson",
            Some("347-555-1122".into()),
            Some("Cardiology".into()),
        )
        .unwrap()
    }

    #[test]
    fn insert_and_retrieve_round_trip() {
        let conn = test_db();
        let clinician = make_clinician("00000001");
        insert_clinician(&conn, &clinician).unwrap();
        let loaded = get_clinician(&conn, &clinician.hcp_id).unwrap().unwrap();
        assert_eq!(loaded, clinician);
    }

    #[test]
    fn update_contact_number() {
        let conn = test_db();
        let mut clinician = make_clinician("00000002");
        insert_clinician(&conn, &clinician).unwrap();

        clinician.contact_number = Some("212-555-7890".into());
        update_clinician(&conn, &clinician).unwrap();

        let loaded = get_clinician(&conn, &clinician.hcp_id).unwrap().unwrap();
        assert_eq!(loaded.contact_number.as_deref(), Some("212-555-7890"));
    }

    #[test]
    fn update_missing_is_not_found() {
        let conn = test_db();
        let result = update_clinician(&conn, &make_clinician("00000009"));
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn delete_missing_is_not_found() {
        let conn = test_db();
        let result = delete_clinician(&conn, &RecordId::new("00000009").unwrap());
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn list_returns_all() {
        let conn = test_db();
        insert_clinician(&conn, &make_clinician("00000001")).unwrap();
        insert_clinician(&conn, &make_clinician("00000002")).unwrap();
        assert_eq!(get_all_clinicians(&conn).unwrap().len(), 2);
    }
}
