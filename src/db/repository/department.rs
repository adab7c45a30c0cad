use rusqlite::{params, Connection, OptionalExtension};

use super::composite_id;
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_department_membership(
    conn: &Connection,
    membership: &DepartmentMembership,
) -> Result<(), DatabaseError> {
    membership.validate()?;
    conn.execute(
        "INSERT INTO HCPDepartments (HCPID, DepartmentName) VALUES (?1, ?2)",
        params![membership.hcp_id, membership.department_name],
    )
    .map_err(DatabaseError::from_write)?;
    tracing::debug!(
        hcp_id = %membership.hcp_id,
        department = %membership.department_name,
        "Department membership inserted"
    );
    Ok(())
}

pub fn get_department_membership(
    conn: &Connection,
    hcp_id: &RecordId,
    department_name: &str,
) -> Result<Option<DepartmentMembership>, DatabaseError> {
    let membership = conn
        .query_row(
            "SELECT HCPID, DepartmentName FROM HCPDepartments
             WHERE HCPID = ?1 AND DepartmentName = ?2",
            params![hcp_id, department_name],
            membership_from_row,
        )
        .optional()?;
    Ok(membership)
}

pub fn get_all_department_memberships(
    conn: &Connection,
) -> Result<Vec<DepartmentMembership>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT HCPID, DepartmentName FROM HCPDepartments ORDER BY HCPID, DepartmentName",
    )?;
    let rows = stmt.query_map([], membership_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_departments_for_clinician(
    conn: &Connection,
    hcp_id: &RecordId,
) -> Result<Vec<DepartmentMembership>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT HCPID, DepartmentName FROM HCPDepartments
         WHERE HCPID = ?1 ORDER BY DepartmentName",
    )?;
    let rows = stmt.query_map(params![hcp_id], membership_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Rename one membership row. Renaming onto an existing pair is a constraint violation.
pub fn rename_department_membership(
    conn: &Connection,
    hcp_id: &RecordId,
    department_name: &str,
    new_department_name: &str,
) -> Result<(), DatabaseError> {
    DepartmentMembership::new(hcp_id.clone(), new_department_name)?;
    let affected = conn
        .execute(
            "UPDATE HCPDepartments SET DepartmentName = ?1
             WHERE HCPID = ?2 AND DepartmentName = ?3",
            params![new_department_name, hcp_id, department_name],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found(
            "DepartmentMembership",
            composite_id(&[hcp_id, &department_name]),
        ));
    }
    tracing::debug!(hcp_id = %hcp_id, from = department_name, to = new_department_name, "Department renamed");
    Ok(())
}

pub fn delete_department_membership(
    conn: &Connection,
    hcp_id: &RecordId,
    department_name: &str,
) -> Result<(), DatabaseError> {
    let affected = conn
        .execute(
            "DELETE FROM HCPDepartments WHERE HCPID = ?1 AND DepartmentName = ?2",
            params![hcp_id, department_name],
        )
        .map_err(DatabaseError::from_write)?;
    if affected == 0 {
        return Err(DatabaseError::not_found(
            "DepartmentMembership",
            composite_id(&[hcp_id, &department_name]),
        ));
    }
    tracing::info!(hcp_id = %hcp_id, department = department_name, "Department membership deleted");
    Ok(())
}

fn membership_from_row(row: &rusqlite::Row<'_>) -> Result<DepartmentMembership, rusqlite::Error> {
    Ok(DepartmentMembership {
        hcp_id: row.get(0)?,
        department_name: row.get(1)?,
    })
}
