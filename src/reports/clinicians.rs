//! Clinician and department reports.
//!
//! Department membership always goes through the `ClinicianDepartments`
//! view, so a clinician's free-text department and their `HCPDepartments`
//! rows count the same. Names match exactly, case included.

use rusqlite::{params, Connection};

use super::types::*;
use super::{group_sorted, join_list};
use crate::db::repository::clinician_from_row;
use crate::db::DatabaseError;
use crate::models::{Clinician, RecordId};

pub fn clinicians_by_department(conn: &Connection, department: &str) -> Result<Vec<Clinician>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT h.HCPID, h.FirstName, h.LastName, h.ContactNumber, h.Department
         FROM HealthCareProfessionals h
         WHERE EXISTS (
             SELECT 1 FROM ClinicianDepartments cd
             WHERE cd.HCPID = h.HCPID AND cd.DepartmentName = ?1
         )
         ORDER BY h.HCPID",
    )?;
    let rows = stmt
        .query_map(params![department], clinician_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(department, rows = rows.len(), "clinicians_by_department");
    Ok(rows)
}

/// Departments where no member clinician is anyone's primary clinician.
pub fn departments_without_patients(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT cd.DepartmentName
         FROM ClinicianDepartments cd
         WHERE NOT EXISTS (
             SELECT 1 FROM ClinicianDepartments member
             WHERE member.DepartmentName = cd.DepartmentName
               AND EXISTS (SELECT 1 FROM Patients p WHERE p.PrimaryHCPID = member.HCPID)
         )
         ORDER BY cd.DepartmentName",
    )?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(rows = rows.len(), "departments_without_patients");
    Ok(rows)
}

/// Visits per patient for the department's patients (those whose primary
/// clinician belongs to it). An unknown or empty department gives
/// `average: None`.
pub fn average_visits_per_patient_by_department(
    conn: &Connection,
    department: &str,
) -> Result<DepartmentVisitAverage, DatabaseError> {
    let (total_visits, patient_count): (u32, u32) = conn.query_row(
        "WITH department_patients AS (
             SELECT p.PatientID
             FROM Patients p
             WHERE p.PrimaryHCPID IN (
                 SELECT cd.HCPID FROM ClinicianDepartments cd WHERE cd.DepartmentName = ?1
             )
         )
         SELECT
             (SELECT COUNT(*) FROM Visits v
              WHERE v.PatientID IN (SELECT PatientID FROM department_patients)),
             (SELECT COUNT(*) FROM department_patients)",
        params![department],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let result = DepartmentVisitAverage::new(department, total_visits, patient_count);
    tracing::debug!(
        department,
        total_visits,
        patient_count,
        "average_visits_per_patient_by_department"
    );
    Ok(result)
}

/// One row per clinician listing the patients who name them as primary.
pub fn patients_grouped_by_clinician(conn: &Connection) -> Result<Vec<ClinicianPatients>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT h.HCPID, h.FirstName, h.LastName, p.FirstName || ' ' || p.LastName
         FROM HealthCareProfessionals h
         LEFT JOIN Patients p ON p.PrimaryHCPID = h.HCPID
         ORDER BY h.HCPID, p.PatientID",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, RecordId>(0)?,
                (row.get::<_, String>(1)?, row.get::<_, String>(2)?),
                row.get::<_, Option<String>>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let grouped: Vec<ClinicianPatients> = group_sorted(rows)
        .into_iter()
        .map(|(hcp_id, (first_name, last_name), names)| ClinicianPatients {
            hcp_id,
            first_name,
            last_name,
            patients: join_list(names),
        })
        .collect();
    tracing::debug!(rows = grouped.len(), "patients_grouped_by_clinician");
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{get_patient, update_patient};
    use crate::db::sqlite::open_memory_database;
    use crate::seed::populate_all;

    fn test_db() -> Connection {
        let conn = open_memory_database().unwrap();
        populate_all(&conn).unwrap();
        conn
    }

    fn id(s: &str) -> RecordId {
        RecordId::new(s).unwrap()
    }

    #[test]
    fn department_lookup_uses_free_text_and_rows() {
        let conn = test_db();
        let cardiology = clinicians_by_department(&conn, "Cardiology").unwrap();
        assert_eq!(cardiology.len(), 1);
        assert_eq!(cardiology[0].full_name(), "James Wilson");

        // Free-text only
        let emergency = clinicians_by_department(&conn, "Emergency Medicine").unwrap();
        assert_eq!(emergency[0].hcp_id.as_str(), "00000004");

        // HCPDepartments only
        let neonatology = clinicians_by_department(&conn, "Neonatology").unwrap();
        assert_eq!(neonatology[0].hcp_id.as_str(), "00000004");
    }

    #[test]
    fn department_match_is_case_sensitive() {
        let conn = test_db();
        assert!(clinicians_by_department(&conn, "cardiology").unwrap().is_empty());
        assert!(clinicians_by_department(&conn, "Dermatology").unwrap().is_empty());
    }

    #[test]
    fn departments_without_patients_on_seed() {
        let conn = test_db();
        let rows = departments_without_patients(&conn).unwrap();
        assert_eq!(
            rows,
            vec!["General Surgery", "Orthopedics", "Sports Medicine", "Trauma Surgery"]
        );
    }

    #[test]
    fn assigning_a_patient_removes_department() {
        let conn = test_db();
        let mut patient = get_patient(&conn, &id("00000005")).unwrap().unwrap();
        patient.primary_hcp_id = Some(id("00000003"));
        update_patient(&conn, &patient).unwrap();

        let rows = departments_without_patients(&conn).unwrap();
        assert_eq!(rows, vec!["General Surgery", "Trauma Surgery"]);
    }

    #[test]
    fn cardiology_average_is_two() {
        let conn = test_db();
        let avg = average_visits_per_patient_by_department(&conn, "Cardiology").unwrap();
        assert_eq!(avg.total_visits, 2);
        assert_eq!(avg.patient_count, 1);
        assert_eq!(avg.average, Some(2.0));

        let neurology = average_visits_per_patient_by_department(&conn, "Neurology").unwrap();
        assert_eq!(neurology.average, Some(1.0));
    }

    #[test]
    fn department_without_patients_has_no_average() {
        let conn = test_db();
        let avg = average_visits_per_patient_by_department(&conn, "Orthopedics").unwrap();
        assert_eq!(avg.patient_count, 0);
        assert_eq!(avg.average, None);

        let unknown = average_visits_per_patient_by_department(&conn, "Nowhere").unwrap();
        assert_eq!(unknown.average, None);
    }

    #[test]
    fn fractional_average_and_truncation() {
        let conn = test_db();
        let mut patient = get_patient(&conn, &id("00000004")).unwrap().unwrap();
        patient.primary_hcp_id = Some(id("00000001"));
        update_patient(&conn, &patient).unwrap();

        let avg = average_visits_per_patient_by_department(&conn, "Cardiology").unwrap();
        assert_eq!((avg.total_visits, avg.patient_count), (3, 2));
        assert_eq!(avg.average, Some(1.5));
        assert_eq!(avg.truncated(), Some(1));
    }

    #[test]
    fn grouped_patients_per_clinician() {
        let conn = test_db();
        let rows = patients_grouped_by_clinician(&conn).unwrap();
        let listed: Vec<_> = rows
            .iter()
            .map(|r| (r.hcp_id.as_str(), r.patients.as_deref()))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("00000001", Some("John Doe")),
                ("00000002", Some("Jane Smith")),
                ("00000003", None),
                ("00000004", Some("Emily Johnson")),
                ("00000005", None),
            ]
        );
    }

    #[test]
    fn grouped_names_follow_patient_order() {
        let conn = test_db();
        let mut patient = get_patient(&conn, &id("00000005")).unwrap().unwrap();
        patient.primary_hcp_id = Some(id("00000001"));
        update_patient(&conn, &patient).unwrap();

        let rows = patients_grouped_by_clinician(&conn).unwrap();
        assert_eq!(rows[0].patients.as_deref(), Some("John Doe; Sarah Davis"));
    }
}
