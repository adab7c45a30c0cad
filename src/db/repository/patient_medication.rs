use rusqlite::{params, Connection, OptionalExtension};

use super::{composite_id, parse_opt_date};
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_patient_medication(conn: &Connection, prescription: &PatientMedication) -> Result<(), DatabaseError> {
    prescription.validate()?;
    conn.execute(
        "INSERT INTO PatientMedications (PatientID, MedicationID, StartDate, EndDate, Dosage)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            prescription.patient_id,
            prescription.medication_id,
            prescription.start_date.map(|d| d.to_string()),
            prescription.end_date.map(|d| d.to_string()),
            prescription.dosage,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    tracing::debug!(
        patient_id = %prescription.patient_id,
        medication_id = %prescription.medication_id,
        "Prescription inserted"
    );
    Ok(())
}

pub fn get_patient_medication(
    conn: &Connection,
    patient_id: &RecordId,
    medication_id: &RecordId,
) -> Result<Option<PatientMedication>, DatabaseError> {
    let prescription = conn
        .query_row(
            "SELECT PatientID, MedicationID, StartDate, EndDate, Dosage
             FROM PatientMedications WHERE PatientID = ?1 AND MedicationID = ?2",
            params![patient_id, medication_id],
            patient_medication_from_row,
        )
        .optional()?;
    Ok(prescription)
}

pub fn get_all_patient_medications(conn: &Connection) -> Result<Vec<PatientMedication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT PatientID, MedicationID, StartDate, EndDate, Dosage
         FROM PatientMedications ORDER BY PatientID, MedicationID",
    )?;
    let rows = stmt.query_map([], patient_medication_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_medications_for_patient(
    conn: &Connection,
    patient_id: &RecordId,
) -> Result<Vec<PatientMedication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT PatientID, MedicationID, StartDate, EndDate, Dosage
         FROM PatientMedications WHERE PatientID = ?1 ORDER BY MedicationID",
    )?;
    let rows = stmt.query_map(params![patient_id], patient_medication_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Dates and dosage are mutable; the (patient, medication) key is not.
pub fn update_patient_medication(conn: &Connection, prescription: &PatientMedication) -> Result<(), DatabaseError> {
    prescription.validate()?;
    let affected = conn
        .execute(
            "UPDATE PatientMedications SET StartDate = ?1, EndDate = ?2, Dosage = ?3
             WHERE PatientID = ?4 AND MedicationID = ?5",
            params![
                prescription.start_date.map(|d| d.to_string()),
                prescription.end_date.map(|d| d.to_string()),
                prescription.dosage,
                prescription.patient_id,
                prescription.medication_id,
            ],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found(
            "PatientMedication",
            composite_id(&[&prescription.patient_id, &prescription.medication_id]),
        ));
    }
    Ok(())
}

pub fn delete_patient_medication(
    conn: &Connection,
    patient_id: &RecordId,
    medication_id: &RecordId,
) -> Result<(), DatabaseError> {
    let affected = conn
        .execute(
            "DELETE FROM PatientMedications WHERE PatientID = ?1 AND MedicationID = ?2",
            params![patient_id, medication_id],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found(
            "PatientMedication",
            composite_id(&[patient_id, medication_id]),
        ));
    }
    tracing::info!(patient_id = %patient_id, medication_id = %medication_id, "Prescription deleted");
    Ok(())
}

fn patient_medication_from_row(row: &rusqlite::Row<'_>) -> Result<PatientMedication, rusqlite::Error> {
    Ok(PatientMedication {
        patient_id: row.get(0)?,
        medication_id: row.get(1)?,
        start_date: parse_opt_date(2, row.get(2)?)?,
        end_date: parse_opt_date(3, row.get(3)?)?,
        dosage: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_medication, insert_patient};
    use crate::db::sqlite::open_memory_database;
    use chrono::NaiveDate;

    fn id(s: &str) -> RecordId {
        RecordId::new(s).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn test_db() -> Connection {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &Patient::new(id("00000001"), "John", "Doe", None).unwrap()).unwrap();
        for (code, name) in [("00000001", "Aspirin"), ("00000003", "Paracetamol")] {
            insert_medication(&conn, &Medication::new(id(code), name, None, None).unwrap()).unwrap();
        }
        conn
    }

    fn prescription(med: &str) -> PatientMedication {
        PatientMedication::new(
            id("00000001"),
            id(med),
            Some(d(2023, 1, 1)),
            Some(d(2023, 6, 1)),
            Some("500mg".into()),
        )
        .unwrap()
    }

    #[test]
    fn insert_and_retrieve_round_trip() {
        let conn = test_db();
        insert_patient_medication(&conn, &prescription("00000001")).unwrap();
        let loaded = get_patient_medication(&conn, &id("00000001"), &id("00000001"))
            .unwrap()
            .unwrap();
        assert_eq!(loaded, prescription("00000001"));
    }

    #[test]
    fn same_medication_twice_is_constraint_violation() {
        let conn = test_db();
        insert_patient_medication(&conn, &prescription("00000001")).unwrap();
        let result = insert_patient_medication(&conn, &prescription("00000001"));
        assert!(matches!(result, Err(DatabaseError::ConstraintViolation(_))));
    }

    #[test]
    fn patient_listing_ordered_by_medication() {
        let conn = test_db();
        insert_patient_medication(&conn, &prescription("00000003")).unwrap();
        insert_patient_medication(&conn, &prescription("00000001")).unwrap();
        let meds = get_medications_for_patient(&conn, &id("00000001")).unwrap();
        let ids: Vec<_> = meds.iter().map(|m| m.medication_id.as_str()).collect();
        assert_eq!(ids, vec!["00000001", "00000003"]);
        assert_eq!(get_all_patient_medications(&conn).unwrap().len(), 2);
    }

    #[test]
    fn update_changes_dosage() {
        let conn = test_db();
        insert_patient_medication(&conn, &prescription("00000001")).unwrap();
        let mut changed = prescription("00000001");
        changed.dosage = Some("250mg".into());
        changed.end_date = None;
        update_patient_medication(&conn, &changed).unwrap();
        let loaded = get_patient_medication(&conn, &id("00000001"), &id("00000001"))
            .unwrap()
            .unwrap();
        assert_eq!(loaded, changed);
    }

    #[test]
    fn delete_twice_is_not_found() {
        let conn = test_db();
        insert_patient_medication(&conn, &prescription("00000001")).unwrap();
        delete_patient_medication(&conn, &id("00000001"), &id("00000001")).unwrap();
        let result = delete_patient_medication(&conn, &id("00000001"), &id("00000001"));
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
