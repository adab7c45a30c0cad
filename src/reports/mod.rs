//! Reporting query layer.
//!
//! Read-only analytical queries over the records schema. Every report
//! takes a borrowed connection plus its filters and returns typed rows
//! ordered by primary key. Zero matching rows is an empty result; store
//! failures always propagate.

pub mod clinicians;
pub mod medications;
pub mod patients;
pub mod types;

pub use clinicians::*;
pub use medications::*;
pub use patients::*;
pub use types::*;

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::RecordId;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Unknown report: {0}")]
    UnknownReport(String),

    #[error("Report '{report}' needs argument: {argument}")]
    MissingArgument {
        report: &'static str,
        argument: &'static str,
    },

    #[error("Invalid argument for {argument}: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A report the dispatcher can run by name.
#[derive(Debug, Clone, Copy)]
pub struct ReportDescriptor {
    pub name: &'static str,
    /// Argument names, in order.
    pub arguments: &'static [&'static str],
    /// Arguments used when every report is printed in one pass.
    pub defaults: &'static [&'static str],
}

pub const REPORTS: &[ReportDescriptor] = &[
    ReportDescriptor { name: "patients-without-visits", arguments: &[], defaults: &[] },
    ReportDescriptor { name: "patients-by-insurance", arguments: &["insurance_id"], defaults: &["00000001"] },
    ReportDescriptor {
        name: "patients-covered-on",
        arguments: &["insurance_id", "date"],
        defaults: &["00000001", "2023-06-01"],
    },
    ReportDescriptor { name: "patients-with-multiple-medications", arguments: &[], defaults: &[] },
    ReportDescriptor { name: "patients-by-medication", arguments: &["medication_name"], defaults: &["Aspirin"] },
    ReportDescriptor { name: "visit-count-per-patient", arguments: &[], defaults: &[] },
    ReportDescriptor { name: "departments-without-patients", arguments: &[], defaults: &[] },
    ReportDescriptor { name: "patients-over-age", arguments: &["age"], defaults: &["65"] },
    ReportDescriptor { name: "clinicians-by-department", arguments: &["department"], defaults: &["Cardiology"] },
    ReportDescriptor { name: "medications-with-side-effects", arguments: &[], defaults: &[] },
    ReportDescriptor {
        name: "average-visits-by-department",
        arguments: &["department"],
        defaults: &["Cardiology"],
    },
    ReportDescriptor { name: "patients-grouped-by-clinician", arguments: &[], defaults: &[] },
];

pub fn find_report(name: &str) -> Option<&'static ReportDescriptor> {
    REPORTS.iter().find(|r| r.name == name)
}

/// Run one report by name and render its rows as JSON.
///
/// `today` anchors the age report so output is reproducible.
pub fn run_named_report(
    conn: &Connection,
    name: &str,
    args: &[&str],
    today: NaiveDate,
) -> Result<serde_json::Value, ReportError> {
    let report = find_report(name).ok_or_else(|| ReportError::UnknownReport(name.to_string()))?;
    let arg = |idx: usize| required_arg(report, args, idx);
    tracing::debug!(report = report.name, ?args, "Running report");

    match report.name {
        "patients-without-visits" => to_json(patients_without_visits(conn)?),
        "patients-by-insurance" => to_json(patients_by_insurance(conn, &parse_id(arg(0)?)?)?),
        "patients-covered-on" => {
            to_json(patients_covered_on(conn, &parse_id(arg(0)?)?, parse_date(arg(1)?)?)?)
        }
        "patients-with-multiple-medications" => to_json(patients_with_multiple_medications(conn)?),
        "patients-by-medication" => to_json(patients_by_medication(conn, arg(0)?)?),
        "visit-count-per-patient" => to_json(visit_count_per_patient(conn)?),
        "departments-without-patients" => to_json(departments_without_patients(conn)?),
        "patients-over-age" => to_json(patients_over_age(conn, parse_age(arg(0)?)?, today)?),
        "clinicians-by-department" => to_json(clinicians_by_department(conn, arg(0)?)?),
        "medications-with-side-effects" => to_json(medications_with_side_effects(conn)?),
        "average-visits-by-department" => {
            to_json(average_visits_per_patient_by_department(conn, arg(0)?)?)
        }
        "patients-grouped-by-clinician" => to_json(patients_grouped_by_clinician(conn)?),
        other => Err(ReportError::UnknownReport(other.to_string())),
    }
}

fn required_arg<'a>(report: &ReportDescriptor, args: &[&'a str], idx: usize) -> Result<&'a str, ReportError> {
    args.get(idx).copied().ok_or(ReportError::MissingArgument {
        report: report.name,
        argument: report.arguments.get(idx).copied().unwrap_or("argument"),
    })
}

fn to_json<T: Serialize>(rows: T) -> Result<serde_json::Value, ReportError> {
    Ok(serde_json::to_value(rows)?)
}

fn parse_id(value: &str) -> Result<RecordId, ReportError> {
    RecordId::new(value).map_err(|e| ReportError::InvalidArgument {
        argument: "id",
        reason: e.to_string(),
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| ReportError::InvalidArgument {
        argument: "date",
        reason: e.to_string(),
    })
}

fn parse_age(value: &str) -> Result<u32, ReportError> {
    value.parse().map_err(|e: std::num::ParseIntError| ReportError::InvalidArgument {
        argument: "age",
        reason: e.to_string(),
    })
}

/// Fold rows already sorted by key into one entry per key, collecting the
/// optional member carried by each row.
pub(crate) fn group_sorted<K: PartialEq, H, M>(rows: Vec<(K, H, Option<M>)>) -> Vec<(K, H, Vec<M>)> {
    let mut groups: Vec<(K, H, Vec<M>)> = Vec::new();
    for (key, head, member) in rows {
        if let Some(group) = groups.last_mut().filter(|g| g.0 == key) {
            group.2.extend(member);
            continue;
        }
        groups.push((key, head, member.into_iter().collect()));
    }
    groups
}

/// `"; "`-joined list, `None` when empty.
pub(crate) fn join_list(items: Vec<String>) -> Option<String> {
    (!items.is_empty()).then(|| items.join("; "))
}
