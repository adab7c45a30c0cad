use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::Severity;
use super::ids::{optional_text, require_text, RecordId};
use crate::db::DatabaseError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub medication_id: RecordId,
    pub medication_name: String,
    pub dosage: Option<String>,
    pub manufacturer: Option<String>,
}

impl Medication {
    pub fn new(
        medication_id: RecordId,
        medication_name: impl Into<String>,
        dosage: Option<String>,
        manufacturer: Option<String>,
    ) -> Result<Self, DatabaseError> {
        let medication = Self {
            medication_id,
            medication_name: medication_name.into(),
            dosage,
            manufacturer,
        };
        medication.validate()?;
        Ok(medication)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_text("medication name", &self.medication_name)?;
        optional_text("dosage", self.dosage.as_deref())?;
        optional_text("manufacturer", self.manufacturer.as_deref())?;
        Ok(())
    }
}

/// Prescription of one medication to one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientMedication {
    pub patient_id: RecordId,
    pub medication_id: RecordId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub dosage: Option<String>,
}

impl PatientMedication {
    pub fn new(
        patient_id: RecordId,
        medication_id: RecordId,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        dosage: Option<String>,
    ) -> Result<Self, DatabaseError> {
        let prescription = Self {
            patient_id,
            medication_id,
            start_date,
            end_date,
            dosage,
        };
        prescription.validate()?;
        Ok(prescription)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        optional_text("dosage", self.dosage.as_deref())?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(DatabaseError::validation(
                    "prescription dates",
                    format!("end {end} precedes start {start}"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffect {
    pub medication_id: RecordId,
    pub description: String,
    pub severity: Option<Severity>,
}

impl SideEffect {
    pub fn new(
        medication_id: RecordId,
        description: impl Into<String>,
        severity: Option<Severity>,
    ) -> Result<Self, DatabaseError> {
        let effect = Self {
            medication_id,
            description: description.into(),
            severity,
        };
        effect.validate()?;
        Ok(effect)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_text("side effect description", &self.description)
    }
}
