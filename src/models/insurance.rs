use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{optional_text, require_text, RecordId};
use crate::db::DatabaseError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insurance {
    pub insurance_id: RecordId,
    pub insurance_name: String,
    pub email: Option<String>,
    pub contact_number: Option<String>,
}

impl Insurance {
    pub fn new(
        insurance_id: RecordId,
        insurance_name: impl Into<String>,
        email: Option<String>,
        contact_number: Option<String>,
    ) -> Result<Self, DatabaseError> {
        let insurance = Self {
            insurance_id,
            insurance_name: insurance_name.into(),
            email,
            contact_number,
        };
        insurance.validate()?;
        Ok(insurance)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_text("insurance name", &self.insurance_name)?;
        optional_text("contact number", self.contact_number.as_deref())?;
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(DatabaseError::validation("email", format!("'{email}' is not an address")));
            }
        }
        Ok(())
    }
}

/// Patient ↔ insurer link with its coverage window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInsurance {
    pub patient_id: RecordId,
    pub insurance_id: RecordId,
    pub coverage_start: Option<NaiveDate>,
    /// `None` means ongoing coverage.
    pub coverage_end: Option<NaiveDate>,
}

impl PatientInsurance {
    pub fn new(
        patient_id: RecordId,
        insurance_id: RecordId,
        coverage_start: Option<NaiveDate>,
        coverage_end: Option<NaiveDate>,
    ) -> Result<Self, DatabaseError> {
        let link = Self {
            patient_id,
            insurance_id,
            coverage_start,
            coverage_end,
        };
        link.validate()?;
        Ok(link)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        if let (Some(start), Some(end)) = (self.coverage_start, self.coverage_end) {
            if end < start {
                return Err(DatabaseError::validation(
                    "coverage window",
                    format!("end {end} precedes start {start}"),
                ));
            }
        }
        Ok(())
    }

    /// Coverage is active on `date` when it has started and not yet ended.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.coverage_start.map_or(true, |start| start <= date)
            && self.coverage_end.map_or(true, |end| end >= date)
    }
}
