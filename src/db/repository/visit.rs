use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::{composite_id, parse_date};
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_visit(conn: &Connection, visit: &Visit) -> Result<(), DatabaseError> {
    visit.validate()?;
    conn.execute(
        "INSERT INTO Visits (PatientID, VisitDate, HCPID, Reason, Notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            visit.patient_id,
            visit.visit_date.to_string(),
            visit.hcp_id,
            visit.reason,
            visit.notes,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    tracing::debug!(patient_id = %visit.patient_id, date = %visit.visit_date, "Visit inserted");
    Ok(())
}

pub fn get_visit(
    conn: &Connection,
    patient_id: &RecordId,
    visit_date: NaiveDate,
) -> Result<Option<Visit>, DatabaseError> {
    let visit = conn
        .query_row(
            "SELECT PatientID, VisitDate, HCPID, Reason, Notes
             FROM Visits WHERE PatientID = ?1 AND VisitDate = ?2",
            params![patient_id, visit_date.to_string()],
            visit_from_row,
        )
        .optional()?;
    Ok(visit)
}

pub fn get_all_visits(conn: &Connection) -> Result<Vec<Visit>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT PatientID, VisitDate, HCPID, Reason, Notes
         FROM Visits ORDER BY PatientID, VisitDate",
    )?;
    let rows = stmt.query_map([], visit_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Visits for one patient, most recent first.
pub fn get_visits_for_patient(conn: &Connection, patient_id: &RecordId) -> Result<Vec<Visit>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT PatientID, VisitDate, HCPID, Reason, Notes
         FROM Visits WHERE PatientID = ?1 ORDER BY VisitDate DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], visit_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Rewrite the visit keyed by (`visit.patient_id`, `visit_date`). The date
/// itself may move to `visit.visit_date`.
pub fn update_visit(conn: &Connection, visit_date: NaiveDate, visit: &Visit) -> Result<(), DatabaseError> {
    visit.validate()?;
    let affected = conn
        .execute(
            "UPDATE Visits SET VisitDate = ?1, HCPID = ?2, Reason = ?3, Notes = ?4
             WHERE PatientID = ?5 AND VisitDate = ?6",
            params![
                visit.visit_date.to_string(),
                visit.hcp_id,
                visit.reason,
                visit.notes,
                visit.patient_id,
                visit_date.to_string(),
            ],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found(
            "Visit",
            composite_id(&[&visit.patient_id, &visit_date]),
        ));
    }
    Ok(())
}

pub fn delete_visit(conn: &Connection, patient_id: &RecordId, visit_date: NaiveDate) -> Result<(), DatabaseError> {
    let affected = conn
        .execute(
            "DELETE FROM Visits WHERE PatientID = ?1 AND VisitDate = ?2",
            params![patient_id, visit_date.to_string()],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found("Visit", composite_id(&[patient_id, &visit_date])));
    }
    tracing::info!(patient_id = %patient_id, date = %visit_date, "Visit deleted");
    Ok(())
}

fn visit_from_row(row: &rusqlite::Row<'_>) -> Result<Visit, rusqlite::Error> {
    let visit_date: String = row.get(1)?;
    Ok(Visit {
        patient_id: row.get(0)?,
        visit_date: parse_date(1, &visit_date)?,
        hcp_id: row.get(2)?,
        reason: row.get(3)?,
        notes: row.get(4)?,
    })
}
