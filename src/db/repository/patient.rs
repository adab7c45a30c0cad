use rusqlite::{params, Connection, OptionalExtension};

use super::parse_opt_date;
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    patient.validate()?;
    conn.execute(
        "INSERT INTO Patients (PatientID, FirstName, LastName, DOB, Address, PhoneNumber, PrimaryHCPID)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            patient.patient_id,
            patient.first_name,
            patient.last_name,
            patient.date_of_birth.map(|d| d.to_string()),
            patient.address,
            patient.phone_number,
            patient.primary_hcp_id,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    tracing::debug!(patient_id = %patient.patient_id, "Patient inserted");
    Ok(())
}

pub fn get_patient(conn: &Connection, patient_id: &RecordId) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            "SELECT PatientID, FirstName, LastName, DOB, Address, PhoneNumber, PrimaryHCPID
             FROM Patients WHERE PatientID = ?1",
            params![patient_id],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

pub fn get_all_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT PatientID, FirstName, LastName, DOB, Address, PhoneNumber, PrimaryHCPID
         FROM Patients ORDER BY PatientID",
    )?;
    let rows = stmt.query_map([], patient_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Overwrite every non-key column of the patient identified by `patient.patient_id`.
pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    patient.validate()?;
    let affected = conn
        .execute(
            "UPDATE Patients
             SET FirstName = ?1, LastName = ?2, DOB = ?3, Address = ?4, PhoneNumber = ?5, PrimaryHCPID = ?6
             WHERE PatientID = ?7",
            params![
                patient.first_name,
                patient.last_name,
                patient.date_of_birth.map(|d| d.to_string()),
                patient.address,
                patient.phone_number,
                patient.primary_hcp_id,
                patient.patient_id,
            ],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found("Patient", patient.patient_id.as_str()));
    }
    tracing::debug!(patient_id = %patient.patient_id, "Patient updated");
    Ok(())
}

pub fn delete_patient(conn: &Connection, patient_id: &RecordId) -> Result<(), DatabaseError> {
    let affected = conn
        .execute("DELETE FROM Patients WHERE PatientID = ?1", params![patient_id])
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found("Patient", patient_id.as_str()));
    }
    tracing::info!(patient_id = %patient_id, "Patient deleted");
    Ok(())
}

fn patient_from_row(row: &rusqlite::Row<'_>) -> Result<Patient, rusqlite::Error> {
    Ok(Patient {
        patient_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: parse_opt_date(3, row.get(3)?)?,
        address: row.get(4)?,
        phone_number: row.get(5)?,
        primary_hcp_id: row.get(6)?,
    })
}
