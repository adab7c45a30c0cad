//! Demonstration data set.
//!
//! Five clinicians, patients, medications and insurers, plus the visits,
//! coverage, side effects, department rows and prescriptions that link
//! them. Loaded in one transaction: either every row lands or none do.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::repository::*;
use crate::db::DatabaseError;
use crate::models::*;

fn id(value: &str) -> Result<RecordId, DatabaseError> {
    RecordId::new(value)
}

fn date(value: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DatabaseError::validation("seed date", e.to_string()))
}

fn opt_date(value: Option<&str>) -> Result<Option<NaiveDate>, DatabaseError> {
    value.map(date).transpose()
}

const CLINICIANS: &[(&str, &str, &str, &str, &str)] = &[
    ("00000001", "James", "Wilson", "347-555-1122", "Cardiology"),
    ("00000002", "Laura", "Taylor", "347-555-2233", "Neurology"),
    ("00000003", "Robert", "Miller", "646-555-1212", "Orthopedics"),
    ("00000004", "Laura", "Anderson", "347-555-4455", "Emergency Medicine"),
    ("00000005", "David", "Thomas", "347-555-5566", "General Surgery"),
];

const PATIENTS: &[(&str, &str, &str, &str, &str, &str, Option<&str>)] = &[
    ("00000001", "John", "Doe", "1980-05-15", "123 Main St, Cityville", "347-555-9999", Some("00000001")),
    ("00000002", "Jane", "Smith", "1975-09-20", "456 Oak St, Townsville", "347-555-5678", Some("00000002")),
    ("00000003", "Emily", "Johnson", "1990-12-01", "789 Updated Blvd, New City", "347-555-8765", Some("00000004")),
    ("00000004", "Michael", "Smith", "1965-03-10", "321 Elm St, Cityville", "347-555-4321", None),
    ("00000005", "Sarah", "Davis", "2000-07-25", "654 Maple St, Townsville", "347-555-6543", None),
];

const MEDICATIONS: &[(&str, &str, &str, &str)] = &[
    ("00000001", "Aspirin", "500mg", "PharmaCorp"),
    ("00000002", "Ibuprofen", "750mg", "HealthMeds"),
    ("00000003", "Paracetamol", "500mg", "MediCare"),
    ("00000004", "Amoxicillin", "250mg", "BioPharma"),
    ("00000005", "Ciprofloxacin", "500mg", "NewPharmaCorp"),
];

const INSURERS: &[(&str, &str, &str, &str)] = &[
    ("00000001", "HealthPlus", "contact@healthplus.com", "917-555-6677"),
    ("00000002", "CareWell", "support@carewell.com", "212-555-7788"),
    ("00000003", "MedSecure", "info@medsecure.com", "347-555-3344"),
    ("00000004", "LifeCare", "help@lifecare.com", "917-555-9900"),
    ("00000005", "HealthPremium", "service@wellhealth.com", "646-555-1010"),
];

const VISITS: &[(&str, &str, &str, &str, &str)] = &[
    ("00000001", "2023-11-15", "00000001", "Routine Check-up", "Patient in good health. Scheduled for next visit in 6 months."),
    ("00000002", "2023-06-20", "00000002", "Follow-up", "Discussed test results and adjusted medication."),
    ("00000001", "2022-10-10", "00000003", "Consultation", "Referred to cardiologist for further evaluation."),
    ("00000003", "2023-01-05", "00000004", "Emergency Visit", "Patient presented with severe abdominal pain. Treated and discharged."),
    ("00000004", "2021-12-30", "00000005", "Surgery Follow-up", "Post-operative check-up. Healing progressing well."),
    ("00000005", "2020-01-01", "00000001", "Initial Visit", "New patient intake and preliminary health assessment."),
];

const COVERAGE: &[(&str, &str, &str, Option<&str>)] = &[
    ("00000001", "00000001", "2023-01-01", Some("2024-01-01")),
    ("00000001", "00000002", "2023-02-01", Some("2023-12-31")),
    ("00000002", "00000003", "2023-03-01", None),
    ("00000003", "00000001", "2022-01-01", Some("2022-12-31")),
    ("00000003", "00000005", "2023-04-01", Some("2024-03-31")),
];

const SIDE_EFFECTS: &[(&str, &str, Severity)] = &[
    ("00000001", "Nausea", Severity::Mild),
    ("00000001", "Headache", Severity::Moderate),
    ("00000001", "Dizziness", Severity::Severe),
    ("00000002", "Dizziness", Severity::Mild),
    ("00000003", "Headache", Severity::Moderate),
    ("00000004", "Diarrhea", Severity::Severe),
    ("00000005", "Rash", Severity::Mild),
];

const DEPARTMENTS: &[(&str, &str)] = &[
    ("00000001", "Cardiology"),
    ("00000002", "Neurology"),
    ("00000003", "Orthopedics"),
    ("00000004", "Pediatrics"),
    ("00000005", "General Surgery"),
    ("00000002", "General Medicine"),
    ("00000003", "Sports Medicine"),
    ("00000004", "Neonatology"),
    ("00000005", "Trauma Surgery"),
];

const PRESCRIPTIONS: &[(&str, &str, &str, &str, &str)] = &[
    ("00000001", "00000001", "2023-01-01", "2023-06-01", "500mg"),
    ("00000001", "00000003", "2023-02-01", "2023-07-01", "500mg"),
    ("00000002", "00000002", "2023-03-01", "2023-08-01", "350mg"),
    ("00000002", "00000004", "2023-04-01", "2023-09-01", "250mg"),
    ("00000003", "00000005", "2023-05-01", "2023-10-01", "100mg"),
    ("00000004", "00000003", "2023-06-01", "2023-11-01", "60mg"),
    ("00000005", "00000001", "2023-07-01", "2023-12-01", "50mg"),
];

/// Insert the full demonstration data set. Fails with `ConstraintViolation`
/// if any of the rows already exist, leaving the store untouched.
pub fn populate_all(conn: &Connection) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    for &(hcp, first, last, contact, dept) in CLINICIANS {
        let clinician = Clinician::new(id(hcp)?, first, last, Some(contact.into()), Some(dept.into()))?;
        insert_clinician(&tx, &clinician)?;
    }
    for &(pid, first, last, dob, address, phone, primary) in PATIENTS {
        let mut patient = Patient::new(id(pid)?, first, last, Some(date(dob)?))?.with_contact(address, phone);
        if let Some(hcp) = primary {
            patient = patient.with_primary_hcp(id(hcp)?);
        }
        insert_patient(&tx, &patient)?;
    }
    for &(mid, name, dosage, manufacturer) in MEDICATIONS {
        let medication = Medication::new(id(mid)?, name, Some(dosage.into()), Some(manufacturer.into()))?;
        insert_medication(&tx, &medication)?;
    }
    for &(iid, name, email, contact) in INSURERS {
        let insurer = Insurance::new(id(iid)?, name, Some(email.into()), Some(contact.into()))?;
        insert_insurance(&tx, &insurer)?;
    }
    for &(pid, when, hcp, reason, notes) in VISITS {
        let visit = Visit::new(id(pid)?, date(when)?, Some(id(hcp)?), Some(reason.into()), Some(notes.into()))?;
        insert_visit(&tx, &visit)?;
    }
    for &(pid, iid, start, end) in COVERAGE {
        let link = PatientInsurance::new(id(pid)?, id(iid)?, Some(date(start)?), opt_date(end)?)?;
        insert_patient_insurance(&tx, &link)?;
    }
    for &(mid, description, severity) in SIDE_EFFECTS {
        insert_side_effect(&tx, &SideEffect::new(id(mid)?, description, Some(severity))?)?;
    }
    for &(hcp, name) in DEPARTMENTS {
        insert_department_membership(&tx, &DepartmentMembership::new(id(hcp)?, name)?)?;
    }
    for &(pid, mid, start, end, dosage) in PRESCRIPTIONS {
        let prescription = PatientMedication::new(
            id(pid)?,
            id(mid)?,
            Some(date(start)?),
            Some(date(end)?),
            Some(dosage.into()),
        )?;
        insert_patient_medication(&tx, &prescription)?;
    }

    tx.commit()?;
    tracing::info!(
        clinicians = CLINICIANS.len(),
        patients = PATIENTS.len(),
        visits = VISITS.len(),
        "Demonstration data loaded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn populates_every_table() {
        let conn = test_db();
        populate_all(&conn).unwrap();

        assert_eq!(count(&conn, "HealthCareProfessionals"), 5);
        assert_eq!(count(&conn, "Patients"), 5);
        assert_eq!(count(&conn, "Medications"), 5);
        assert_eq!(count(&conn, "Insurance"), 5);
        assert_eq!(count(&conn, "Visits"), 6);
        assert_eq!(count(&conn, "PatientInsurance"), 5);
        assert_eq!(count(&conn, "SideEffects"), 7);
        assert_eq!(count(&conn, "HCPDepartments"), 9);
        assert_eq!(count(&conn, "PatientMedications"), 7);
    }

    #[test]
    fn seeded_rows_read_back_typed() {
        let conn = test_db();
        populate_all(&conn).unwrap();

        let patient = get_patient(&conn, &RecordId::new("00000003").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(patient.full_name(), "Emily Johnson");
        assert_eq!(patient.primary_hcp_id.as_ref().map(|h| h.as_str()), Some("00000004"));

        let open_ended = get_patient_insurance(
            &conn,
            &RecordId::new("00000002").unwrap(),
            &RecordId::new("00000003").unwrap(),
        )
        .unwrap()
        .unwrap();
        assert!(open_ended.coverage_end.is_none());
    }

    #[test]
    fn second_load_rolls_back_cleanly() {
        let conn = test_db();
        populate_all(&conn).unwrap();

        let result = populate_all(&conn);
        assert!(matches!(result, Err(DatabaseError::ConstraintViolation(_))));
        assert_eq!(count(&conn, "HealthCareProfessionals"), 5);
        assert_eq!(count(&conn, "Visits"), 6);
    }
}
