//! Medication reports: each medication with its side-effect rollup.

use rusqlite::Connection;

use super::types::MedicationSideEffects;
use super::{group_sorted, join_list};
use crate::db::DatabaseError;
use crate::models::RecordId;

/// Every medication with its side effects rendered as
/// `"Severity: Description"`, ordered by description.
pub fn medications_with_side_effects(conn: &Connection) -> Result<Vec<MedicationSideEffects>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT m.MedicationID, m.MedicationName, m.Dosage, s.SideEffectDescription, s.Severity
         FROM Medications m
         LEFT JOIN SideEffects s ON s.MedicationID = m.MedicationID
         ORDER BY m.MedicationID, s.SideEffectDescription",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let description: Option<String> = row.get(3)?;
            let severity: Option<String> = row.get(4)?;
            let effect = description.map(|d| match severity {
                Some(s) => format!("{s}: {d}"),
                None => d,
            });
            Ok((
                row.get::<_, RecordId>(0)?,
                (row.get::<_, String>(1)?, row.get::<_, Option<String>>(2)?),
                effect,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let rows: Vec<MedicationSideEffects> = group_sorted(rows)
        .into_iter()
        .map(|(medication_id, (medication_name, dosage), effects)| MedicationSideEffects {
            medication_id,
            medication_name,
            dosage,
            side_effects: join_list(effects),
        })
        .collect();
    tracing::debug!(rows = rows.len(), "medications_with_side_effects");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_medication, insert_side_effect};
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Medication, SideEffect};
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
    fn aspirin_effects_ordered_by_description() {
        let conn = test_db();
        let rows = medications_with_side_effects(&conn).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].medication_name, "Aspirin");
        assert_eq!(
            rows[0].side_effects.as_deref(),
            Some("Severe: Dizziness; Moderate: Headache; Mild: Nausea")
        );
        assert_eq!(rows[4].side_effects.as_deref(), Some("Mild: Rash"));
    }

    #[test]
    fn medication_without_effects_has_none() {
        let conn = test_db();
        insert_medication(&conn, &Medication::new(id("00000006"), "Placebo", None, None).unwrap()).unwrap();

        let rows = medications_with_side_effects(&conn).unwrap();
        let placebo = rows.iter().find(|r| r.medication_name == "Placebo").unwrap();
        assert_eq!(placebo.side_effects, None);
    }

    #[test]
    fn missing_severity_renders_description_alone() {
        let conn = test_db();
        insert_medication(&conn, &Medication::new(id("00000006"), "Placebo", None, None).unwrap()).unwrap();
        insert_side_effect(&conn, &SideEffect::new(id("00000006"), "Drowsiness", None).unwrap()).unwrap();

        let rows = medications_with_side_effects(&conn).unwrap();
        let placebo = rows.iter().find(|r| r.medication_name == "Placebo").unwrap();
        assert_eq!(placebo.side_effects.as_deref(), Some("Drowsiness"));
    }
}
