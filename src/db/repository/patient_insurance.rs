use rusqlite::{params, Connection, OptionalExtension};

use super::{composite_id, parse_opt_date};
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_patient_insurance(conn: &Connection, link: &PatientInsurance) -> Result<(), DatabaseError> {
    link.validate()?;
    conn.execute(
        "INSERT INTO PatientInsurance (PatientID, InsuranceID, CoverageStartDate, CoverageEndDate)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            link.patient_id,
            link.insurance_id,
            link.coverage_start.map(|d| d.to_string()),
            link.coverage_end.map(|d| d.to_string()),
        ],
    )
    .map_err(DatabaseError::from_write)?;
    tracing::debug!(
        patient_id = %link.patient_id,
        insurance_id = %link.insurance_id,
        "Coverage inserted"
    );
    Ok(())
}

pub fn get_patient_insurance(
    conn: &Connection,
    patient_id: &RecordId,
    insurance_id: &RecordId,
) -> Result<Option<PatientInsurance>, DatabaseError> {
    let link = conn
        .query_row(
            "SELECT PatientID, InsuranceID, CoverageStartDate, CoverageEndDate
             FROM PatientInsurance WHERE PatientID = ?1 AND InsuranceID = ?2",
            params![patient_id, insurance_id],
            patient_insurance_from_row,
        )
        .optional()?;
    Ok(link)
}

pub fn get_all_patient_insurance(conn: &Connection) -> Result<Vec<PatientInsurance>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT PatientID, InsuranceID, CoverageStartDate, CoverageEndDate
         FROM PatientInsurance ORDER BY PatientID, InsuranceID",
    )?;
    let rows = stmt.query_map([], patient_insurance_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_coverage_for_patient(
    conn: &Connection,
    patient_id: &RecordId,
) -> Result<Vec<PatientInsurance>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT PatientID, InsuranceID, CoverageStartDate, CoverageEndDate
         FROM PatientInsurance WHERE PatientID = ?1 ORDER BY InsuranceID",
    )?;
    let rows = stmt.query_map(params![patient_id], patient_insurance_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Rewrite the link keyed by (`link.patient_id`, `insurance_id`). The insurer
/// may change to `link.insurance_id`, and the coverage window is replaced.
pub fn update_patient_insurance(
    conn: &Connection,
    insurance_id: &RecordId,
    link: &PatientInsurance,
) -> Result<(), DatabaseError> {
    link.validate()?;
    let affected = conn
        .execute(
            "UPDATE PatientInsurance
             SET InsuranceID = ?1, CoverageStartDate = ?2, CoverageEndDate = ?3
             WHERE PatientID = ?4 AND InsuranceID = ?5",
            params![
                link.insurance_id,
                link.coverage_start.map(|d| d.to_string()),
                link.coverage_end.map(|d| d.to_string()),
                link.patient_id,
                insurance_id,
            ],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found(
            "PatientInsurance",
            composite_id(&[&link.patient_id, insurance_id]),
        ));
    }
    Ok(())
}

pub fn delete_patient_insurance(
    conn: &Connection,
    patient_id: &RecordId,
    insurance_id: &RecordId,
) -> Result<(), DatabaseError> {
    let affected = conn
        .execute(
            "DELETE FROM PatientInsurance WHERE PatientID = ?1 AND InsuranceID = ?2",
            params![patient_id, insurance_id],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found(
            "PatientInsurance",
            composite_id(&[patient_id, insurance_id]),
        ));
    }
    tracing::info!(patient_id = %patient_id, insurance_id = %insurance_id, "Coverage deleted");
    Ok(())
}

fn patient_insurance_from_row(row: &rusqlite::Row<'_>) -> Result<PatientInsurance, rusqlite::Error> {
    Ok(PatientInsurance {
        patient_id: row.get(0)?,
        insurance_id: row.get(1)?,
        coverage_start: parse_opt_date(2, row.get(2)?)?,
        coverage_end: parse_opt_date(3, row.get(3)?)?,
    })
}
