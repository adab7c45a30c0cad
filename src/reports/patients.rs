//! Patient-centred reports: visits, coverage, prescriptions and age.

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::types::*;
use crate::db::repository::{find_medications_by_name, get_all_patients};
use crate::db::DatabaseError;
use crate::models::RecordId;

fn summary_from_row(row: &rusqlite::Row<'_>) -> Result<PatientSummary, rusqlite::Error> {
    Ok(PatientSummary {
        patient_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
    })
}

/// Patients with no recorded visit at all.
pub fn patients_without_visits(conn: &Connection) -> Result<Vec<PatientSummary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.PatientID, p.FirstName, p.LastName
         FROM Patients p
         WHERE NOT EXISTS (SELECT 1 FROM Visits v WHERE v.PatientID = p.PatientID)
         ORDER BY p.PatientID",
    )?;
    let rows = stmt
        .query_map([], summary_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(rows = rows.len(), "patients_without_visits");
    Ok(rows)
}

/// Patients with any coverage row for the insurer, whatever its dates.
pub fn patients_by_insurance(
    conn: &Connection,
    insurance_id: &RecordId,
) -> Result<Vec<PatientSummary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT p.PatientID, p.FirstName, p.LastName
         FROM Patients p
         JOIN PatientInsurance pi ON pi.PatientID = p.PatientID
         WHERE pi.InsuranceID = ?1
         ORDER BY p.PatientID",
    )?;
    let rows = stmt
        .query_map(params![insurance_id], summary_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(insurance_id = %insurance_id, rows = rows.len(), "patients_by_insurance");
    Ok(rows)
}

/// Patients whose coverage with the insurer includes `date`. Missing start
/// or end dates leave that side of the window open.
pub fn patients_covered_on(
    conn: &Connection,
    insurance_id: &RecordId,
    date: NaiveDate,
) -> Result<Vec<PatientSummary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT p.PatientID, p.FirstName, p.LastName
         FROM Patients p
         JOIN PatientInsurance pi ON pi.PatientID = p.PatientID
         WHERE pi.InsuranceID = ?1
           AND (pi.CoverageStartDate IS NULL OR pi.CoverageStartDate <= ?2)
           AND (pi.CoverageEndDate IS NULL OR pi.CoverageEndDate >= ?2)
         ORDER BY p.PatientID",
    )?;
    let rows = stmt
        .query_map(params![insurance_id, date.to_string()], summary_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(insurance_id = %insurance_id, %date, rows = rows.len(), "patients_covered_on");
    Ok(rows)
}

pub fn patients_with_multiple_medications(
    conn: &Connection,
) -> Result<Vec<PatientMedicationCount>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.PatientID, p.FirstName, p.LastName, COUNT(DISTINCT pm.MedicationID)
         FROM Patients p
         JOIN PatientMedications pm ON pm.PatientID = p.PatientID
         GROUP BY p.PatientID, p.FirstName, p.LastName
         HAVING COUNT(DISTINCT pm.MedicationID) > 1
         ORDER BY p.PatientID",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(PatientMedicationCount {
                patient_id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                medication_count: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(rows = rows.len(), "patients_with_multiple_medications");
    Ok(rows)
}

/// Patients prescribed the medication with this exact name.
///
/// An unknown name yields no rows. A name shared by several medications is
/// rejected with `AmbiguousName` rather than silently merged.
pub fn patients_by_medication(
    conn: &Connection,
    medication_name: &str,
) -> Result<Vec<PatientSummary>, DatabaseError> {
    let matches = find_medications_by_name(conn, medication_name)?;
    let medication = match matches.as_slice() {
        [] => return Ok(Vec::new()),
        [only] => only,
        _ => {
            return Err(DatabaseError::AmbiguousName {
                entity_type: "Medication".into(),
                name: medication_name.into(),
                matches: matches.len(),
            })
        }
    };

    let mut stmt = conn.prepare(
        "SELECT p.PatientID, p.FirstName, p.LastName
         FROM Patients p
         JOIN PatientMedications pm ON pm.PatientID = p.PatientID
         WHERE pm.MedicationID = ?1
         ORDER BY p.PatientID",
    )?;
    let rows = stmt
        .query_map(params![medication.medication_id], summary_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(medication_name, rows = rows.len(), "patients_by_medication");
    Ok(rows)
}

/// Every patient with their visit total, zero included.
pub fn visit_count_per_patient(conn: &Connection) -> Result<Vec<PatientVisitCount>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.PatientID, p.FirstName, p.LastName,
                (SELECT COUNT(*) FROM Visits v WHERE v.PatientID = p.PatientID)
         FROM Patients p
         ORDER BY p.PatientID",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(PatientVisitCount {
                patient_id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                visit_count: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(rows = rows.len(), "visit_count_per_patient");
    Ok(rows)
}

/// Patients strictly older than `age` whole years on `today`. Patients
/// without a date of birth are left out.
pub fn patients_over_age(
    conn: &Connection,
    age: u32,
    today: NaiveDate,
) -> Result<Vec<PatientAge>, DatabaseError> {
    let rows: Vec<PatientAge> = get_all_patients(conn)?
        .into_iter()
        .filter_map(|patient| {
            let years = patient.age_on(today)?;
            (years > age).then(|| PatientAge {
                patient_id: patient.patient_id,
                first_name: patient.first_name,
                last_name: patient.last_name,
                age: years,
            })
        })
        .collect();
    tracing::debug!(age, %today, rows = rows.len(), "patients_over_age");
    Ok(rows)
}

/// [`patients_over_age`] against the local calendar date.
pub fn patients_over_age_today(conn: &Connection, age: u32) -> Result<Vec<PatientAge>, DatabaseError> {
    patients_over_age(conn, age, chrono::Local::now().date_naive())
}
