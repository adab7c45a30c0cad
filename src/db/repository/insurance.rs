use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_insurance(conn: &Connection, insurance: &Insurance) -> Result<(), DatabaseError> {
    insurance.validate()?;
    conn.execute(
        "INSERT INTO Insurance (InsuranceID, InsuranceName, Email, ContactNumber)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            insurance.insurance_id,
            insurance.insurance_name,
            insurance.email,
            insurance.contact_number,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    tracing::debug!(insurance_id = %insurance.insurance_id, "Insurance inserted");
    Ok(())
}

pub fn get_insurance(conn: &Connection, insurance_id: &RecordId) -> Result<Option<Insurance>, DatabaseError> {
    let insurance = conn
        .query_row(
            "SELECT InsuranceID, InsuranceName, Email, ContactNumber
             FROM Insurance WHERE InsuranceID = ?1",
            params![insurance_id],
            insurance_from_row,
        )
        .optional()?;
    Ok(insurance)
}

pub fn get_all_insurance(conn: &Connection) -> Result<Vec<Insurance>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT InsuranceID, InsuranceName, Email, ContactNumber
         FROM Insurance ORDER BY InsuranceID",
    )?;
    let rows = stmt.query_map([], insurance_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn update_insurance(conn: &Connection, insurance: &Insurance) -> Result<(), DatabaseError> {
    insurance.validate()?;
    let affected = conn
        .execute(
            "UPDATE Insurance SET InsuranceName = ?1, Email = ?2, ContactNumber = ?3
             WHERE InsuranceID = ?4",
            params![
                insurance.insurance_name,
                insurance.email,
                insurance.contact_number,
                insurance.insurance_id,
            ],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found("Insurance", insurance.insurance_id.as_str()));
    }
    Ok(())
}

pub fn delete_insurance(conn: &Connection, insurance_id: &RecordId) -> Result<(), DatabaseError> {
    let affected = conn
        .execute("DELETE FROM Insurance WHERE InsuranceID = ?1", params![insurance_id])
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found("Insurance", insurance_id.as_str()));
    }
    tracing::info!(insurance_id = %insurance_id, "Insurance deleted");
    Ok(())
}

fn insurance_from_row(row: &rusqlite::Row<'_>) -> Result<Insurance, rusqlite::Error> {
    Ok(Insurance {
        insurance_id: row.get(0)?,
        insurance_name: row.get(1)?,
        email: row.get(2)?,
        contact_number: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn make_insurance() -> Insurance {
        Insurance::new(
            RecordId::new("00000001").unwrap(),
            "HealthPlus",
            Some("contact@healthplus.com".into()),
            Some("917-555-6677".into()),
        )
        .unwrap()
    }

    #[test]
    fn insert_update_delete_cycle() {
        let conn = open_memory_database().unwrap();
        let mut insurance = make_insurance();
        insert_insurance(&conn, &insurance).unwrap();
        assert_eq!(get_insurance(&conn, &insurance.insurance_id).unwrap(), Some(insurance.clone()));

        insurance.email = Some("service@healthplus.com".into());
        update_insurance(&conn, &insurance).unwrap();
        let loaded = get_insurance(&conn, &insurance.insurance_id).unwrap().unwrap();
        assert_eq!(loaded.email.as_deref(), Some("service@healthplus.com"));

        delete_insurance(&conn, &insurance.insurance_id).unwrap();
        assert!(get_all_insurance(&conn).unwrap().is_empty());
    }

    #[test]
    fn duplicate_insurer_is_constraint_violation() {
        let conn = open_memory_database().unwrap();
        insert_insurance(&conn, &make_insurance()).unwrap();
        let result = insert_insurance(&conn, &make_insurance());
        assert!(result.unwrap_err().is_constraint_violation());
    }

    #[test]
    fn update_missing_is_not_found() {
        let conn = open_memory_database().unwrap();
        let result = update_insurance(&conn, &make_insurance());
        assert!(result.unwrap_err().is_not_found());
    }
}
