use serde::{Deserialize, Serialize};

use crate::models::RecordId;

/// Patient identity as returned by the patient lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub patient_id: RecordId,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientMedicationCount {
    pub patient_id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub medication_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientVisitCount {
    pub patient_id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub visit_count: u32,
}

/// Patient with age in completed years on the reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientAge {
    pub patient_id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationSideEffects {
    pub medication_id: RecordId,
    pub medication_name: String,
    pub dosage: Option<String>,
    /// `"Severity: Description"` pairs joined with `"; "`, `None` when the
    /// medication has no recorded side effects.
    pub side_effects: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicianPatients {
    pub hcp_id: RecordId,
    pub first_name: String,
    pub last_name: String,
    /// `"First Last"` names joined with `"; "`, `None` when nobody lists
    /// this clinician as primary.
    pub patients: Option<String>,
}

/// Visit load for the patients whose primary clinician belongs to a
/// department. Visits are counted regardless of which clinician saw them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentVisitAverage {
    pub department_name: String,
    pub total_visits: u32,
    pub patient_count: u32,
    pub average: Option<f64>,
}

impl DepartmentVisitAverage {
    pub fn new(department_name: impl Into<String>, total_visits: u32, patient_count: u32) -> Self {
        let average = (patient_count > 0).then(|| f64::from(total_visits) / f64::from(patient_count));
        Self {
            department_name: department_name.into(),
            total_visits,
            patient_count,
            average,
        }
    }

    /// Integer quotient, for callers that want whole visits per patient.
    pub fn truncated(&self) -> Option<u32> {
        self.total_visits.checked_div(self.patient_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_patients_has_no_average() {
        let avg = DepartmentVisitAverage::new("Orthopedics", 0, 0);
        assert_eq!(avg.average, None);
        assert_eq!(avg.truncated(), None);
    }

    #[test]
    fn average_keeps_fraction_truncated_drops_it() {
        let avg = DepartmentVisitAverage::new("Cardiology", 3, 2);
        assert_eq!(avg.average, Some(1.5));
        assert_eq!(avg.truncated(), Some(1));
    }

    #[test]
    fn rows_serialize_with_snake_case_fields() {
        let row = ClinicianPatients {
            hcp_id: RecordId::new("00000003").unwrap(),
            first_name: "Robert".into(),
            last_name: "Miller".into(),
            patients: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["hcp_id"], "00000003");
        assert!(json["patients"].is_null());
    }
}
