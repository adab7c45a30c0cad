use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{optional_text, RecordId};
use crate::db::DatabaseError;

/// A logged visit. Keyed by (patient, date): one visit per patient per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub patient_id: RecordId,
    pub visit_date: NaiveDate,
    pub hcp_id: Option<RecordId>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl Visit {
    pub fn new(
        patient_id: RecordId,
        visit_date: NaiveDate,
        hcp_id: Option<RecordId>,
        reason: Option<String>,
        notes: Option<String>,
    ) -> Result<Self, DatabaseError> {
        let visit = Self {
            patient_id,
            visit_date,
            hcp_id,
            reason,
            notes,
        };
        visit.validate()?;
        Ok(visit)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        optional_text("reason", self.reason.as_deref())
    }
}
