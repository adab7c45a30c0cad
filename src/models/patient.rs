use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{optional_text, require_text, RecordId};
use crate::db::DatabaseError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    /// Main point of contact; `None` when no clinician is assigned.
    pub primary_hcp_id: Option<RecordId>,
}

impl Patient {
    pub fn new(
        patient_id: RecordId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: Option<NaiveDate>,
    ) -> Result<Self, DatabaseError> {
        let patient = Self {
            patient_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            address: None,
            phone_number: None,
            primary_hcp_id: None,
        };
        patient.validate()?;
        Ok(patient)
    }

    pub fn with_contact(mut self, address: impl Into<String>, phone_number: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn with_primary_hcp(mut self, hcp_id: RecordId) -> Self {
        self.primary_hcp_id = Some(hcp_id);
        self
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_text("first name", &self.first_name)?;
        require_text("last name", &self.last_name)?;
        optional_text("address", self.address.as_deref())?;
        optional_text("phone number", self.phone_number.as_deref())?;
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whole completed years between date of birth and `today`.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.and_then(|dob| today.years_since(dob))
    }
}
