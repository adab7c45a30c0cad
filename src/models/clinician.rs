use serde::{Deserialize, Serialize};

use super::ids::{optional_text, require_text, RecordId};
use crate::db::DatabaseError;

/// Healthcare professional (HCP).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clinician {
    pub hcp_id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub contact_number: Option<String>,
    /// Free-text home department. Additional memberships live in `HCPDepartments`.
    pub department: Option<String>,
}

impl Clinician {
    pub fn new(
        hcp_id: RecordId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        contact_number: Option<String>,
        department: Option<String>,
    ) -> Result<Self, DatabaseError> {
        let clinician = Self {
            hcp_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            contact_number,
            department,
        };
        clinician.validate()?;
        Ok(clinician)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_text("first name", &self.first_name)?;
        require_text("last name", &self.last_name)?;
        optional_text("contact number", self.contact_number.as_deref())?;
        optional_text("department", self.department.as_deref())?;
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One clinician ↔ department membership row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentMembership {
    pub hcp_id: RecordId,
    pub department_name: String,
}

impl DepartmentMembership {
    pub fn new(hcp_id: RecordId, department_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let membership = Self {
            hcp_id,
            department_name: department_name.into(),
        };
        membership.validate()?;
        Ok(membership)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_text("department name", &self.department_name)
    }
}
