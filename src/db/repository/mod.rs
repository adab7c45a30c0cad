//! Repository layer: entity-scoped database operations.
//!
//! One sub-module per table. Every write validates the typed record first,
//! classifies constraint failures, and checks the affected-row count on
//! update/delete. All public functions are re-exported here.

mod clinician;
mod department;
mod insurance;
mod medication;
mod patient;
mod patient_insurance;
mod patient_medication;
mod side_effect;
mod visit;

use chrono::NaiveDate;
use rusqlite::types::Type;

pub use clinician::*;
pub use department::*;
pub use insurance::*;
pub use medication::*;
pub use patient::*;
pub use patient_insurance::*;
pub use patient_medication::*;
pub use side_effect::*;
pub use visit::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_date(idx: usize, value: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_opt_date(
    idx: usize,
    value: Option<String>,
) -> Result<Option<NaiveDate>, rusqlite::Error> {
    value.map(|v| parse_date(idx, &v)).transpose()
}

/// Composite key rendering for `NotFound` errors.
pub(crate) fn composite_id(parts: &[&dyn std::fmt::Display]) -> String {
    parts
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("/")
}
