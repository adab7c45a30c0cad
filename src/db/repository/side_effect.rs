use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use super::composite_id;
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_side_effect(conn: &Connection, effect: &SideEffect) -> Result<(), DatabaseError> {
    effect.validate()?;
    conn.execute(
        "INSERT INTO SideEffects (MedicationID, SideEffectDescription, Severity)
         VALUES (?1, ?2, ?3)",
        params![
            effect.medication_id,
            effect.description,
            effect.severity.map(|s| s.as_str()),
        ],
    )
    .map_err(DatabaseError::from_write)?;
    tracing::debug!(medication_id = %effect.medication_id, "Side effect inserted");
    Ok(())
}

pub fn get_side_effect(
    conn: &Connection,
    medication_id: &RecordId,
    description: &str,
) -> Result<Option<SideEffect>, DatabaseError> {
    let effect = conn
        .query_row(
            "SELECT MedicationID, SideEffectDescription, Severity
             FROM SideEffects WHERE MedicationID = ?1 AND SideEffectDescription = ?2",
            params![medication_id, description],
            side_effect_from_row,
        )
        .optional()?;
    Ok(effect)
}

pub fn get_side_effects_for_medication(
    conn: &Connection,
    medication_id: &RecordId,
) -> Result<Vec<SideEffect>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT MedicationID, SideEffectDescription, Severity
         FROM SideEffects WHERE MedicationID = ?1 ORDER BY SideEffectDescription",
    )?;
    let rows = stmt.query_map(params![medication_id], side_effect_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_all_side_effects(conn: &Connection) -> Result<Vec<SideEffect>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT MedicationID, SideEffectDescription, Severity
         FROM SideEffects ORDER BY MedicationID, SideEffectDescription",
    )?;
    let rows = stmt.query_map([], side_effect_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Rewrite the row keyed by (`effect.medication_id`, `description`). The
/// description may change along with the severity.
pub fn update_side_effect(conn: &Connection, description: &str, effect: &SideEffect) -> Result<(), DatabaseError> {
    effect.validate()?;
    let affected = conn
        .execute(
            "UPDATE SideEffects SET SideEffectDescription = ?1, Severity = ?2
             WHERE MedicationID = ?3 AND SideEffectDescription = ?4",
            params![
                effect.description,
                effect.severity.map(|s| s.as_str()),
                effect.medication_id,
                description,
            ],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found(
            "SideEffect",
            composite_id(&[&effect.medication_id, &description]),
        ));
    }
    Ok(())
}

pub fn delete_side_effect(conn: &Connection, medication_id: &RecordId, description: &str) -> Result<(), DatabaseError> {
    let affected = conn
        .execute(
            "DELETE FROM SideEffects WHERE MedicationID = ?1 AND SideEffectDescription = ?2",
            params![medication_id, description],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found(
            "SideEffect",
            composite_id(&[medication_id, &description]),
        ));
    }
    tracing::info!(medication_id = %medication_id, description, "Side effect deleted");
    Ok(())
}

fn side_effect_from_row(row: &rusqlite::Row<'_>) -> Result<SideEffect, rusqlite::Error> {
    let severity: Option<String> = row.get(2)?;
    let severity = severity
        .map(|s| Severity::from_str(&s))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(SideEffect {
        medication_id: row.get(0)?,
        description: row.get(1)?,
        severity,
    })
}
