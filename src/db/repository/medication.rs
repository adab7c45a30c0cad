use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_medication(conn: &Connection, medication: &Medication) -> Result<(), DatabaseError> {
    medication.validate()?;
    conn.execute(
        "INSERT INTO Medications (MedicationID, MedicationName, Dosage, Manufacturer)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            medication.medication_id,
            medication.medication_name,
            medication.dosage,
            medication.manufacturer,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    tracing::debug!(medication_id = %medication.medication_id, "Medication inserted");
    Ok(())
}

pub fn get_medication(conn: &Connection, medication_id: &RecordId) -> Result<Option<Medication>, DatabaseError> {
    let medication = conn
        .query_row(
            "SELECT MedicationID, MedicationName, Dosage, Manufacturer
             FROM Medications WHERE MedicationID = ?1",
            params![medication_id],
            medication_from_row,
        )
        .optional()?;
    Ok(medication)
}

pub fn get_all_medications(conn: &Connection) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT MedicationID, MedicationName, Dosage, Manufacturer
         FROM Medications ORDER BY MedicationID",
    )?;
    let rows = stmt.query_map([], medication_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Exact, case-sensitive name match. Names are not unique, so callers
/// decide what more than one hit means.
pub fn find_medications_by_name(conn: &Connection, name: &str) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT MedicationID, MedicationName, Dosage, Manufacturer
         FROM Medications WHERE MedicationName = ?1 ORDER BY MedicationID",
    )?;
    let rows = stmt.query_map(params![name], medication_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn update_medication(conn: &Connection, medication: &Medication) -> Result<(), DatabaseError> {
    medication.validate()?;
    let affected = conn
        .execute(
            "UPDATE Medications SET MedicationName = ?1, Dosage = ?2, Manufacturer = ?3
             WHERE MedicationID = ?4",
            params![
                medication.medication_name,
                medication.dosage,
                medication.manufacturer,
                medication.medication_id,
            ],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found("Medication", medication.medication_id.as_str()));
    }
    tracing::debug!(medication_id = %medication.medication_id, "Medication updated");
    Ok(())
}

/// Restricted while prescriptions or side effects reference the medication.
pub fn delete_medication(conn: &Connection, medication_id: &RecordId) -> Result<(), DatabaseError> {
    let affected = conn
        .execute("DELETE FROM Medications WHERE MedicationID = ?1", params![medication_id])
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found("Medication", medication_id.as_str()));
    }
    tracing::info!(medication_id = %medication_id, "Medication deleted");
    Ok(())
}

fn medication_from_row(row: &rusqlite::Row<'_>) -> Result<Medication, rusqlite::Error> {
    Ok(Medication {
        medication_id: row.get(0)?,
        medication_name: row.get(1)?,
        dosage: row.get(2)?,
        manufacturer: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::insert_side_effect;
    use crate::db::sqlite::open_memory_database;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn id(s: &str) -> RecordId {
        RecordId::new(s).unwrap()
    }

    fn aspirin(code: &str) -> Medication {
        Medication::new(id(code), "Aspirin", Some("500mg".into()), Some("PharmaCorp".into())).unwrap()
    }

    #[test]
    fn insert_and_retrieve_round_trip() {
        let conn = test_db();
        insert_medication(&conn, &aspirin("00000001")).unwrap();
        let loaded = get_medication(&conn, &id("00000001")).unwrap().unwrap();
        assert_eq!(loaded, aspirin("00000001"));
    }

    #[test]
    fn find_by_name_is_exact_and_case_sensitive() {
        let conn = test_db();
        insert_medication(&conn, &aspirin("00000001")).unwrap();
        insert_medication(&conn, &aspirin("00000006")).unwrap();

        assert_eq!(find_medications_by_name(&conn, "Aspirin").unwrap().len(), 2);
        assert!(find_medications_by_name(&conn, "aspirin").unwrap().is_empty());
        assert!(find_medications_by_name(&conn, "Asp").unwrap().is_empty());
    }

    #[test]
    fn update_changes_dosage() {
        let conn = test_db();
        insert_medication(&conn, &aspirin("00000001")).unwrap();
        let mut med = aspirin("00000001");
        med.dosage = Some("81mg".into());
        update_medication(&conn, &med).unwrap();
        let loaded = get_medication(&conn, &id("00000001")).unwrap().unwrap();
        assert_eq!(loaded.dosage.as_deref(), Some("81mg"));
    }

    #[test]
    fn delete_with_side_effects_is_restricted() {
        let conn = test_db();
        insert_medication(&conn, &aspirin("00000001")).unwrap();
        insert_side_effect(
            &conn,
            &SideEffect::new(id("00000001"), "Nausea", Some(Severity::Mild)).unwrap(),
        )
        .unwrap();

        let result = delete_medication(&conn, &id("00000001"));
        assert!(matches!(result, Err(DatabaseError::ConstraintViolation(_))));
    }

    #[test]
    fn delete_missing_is_not_found() {
        let conn = test_db();
        let result = delete_medication(&conn, &id("00000009"));
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        assert!(get_all_medications(&conn).unwrap().is_empty());
    }
}
