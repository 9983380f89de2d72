//! Reference table backing the form pick-lists (the "dropdown list").

use crate::errors::AppResult;
use crate::models::lookup::ReferenceRow;
use rusqlite::{Connection, params};

pub fn load_reference_rows(conn: &Connection) -> AppResult<Vec<ReferenceRow>> {
    let mut stmt = conn.prepare(
        "SELECT driver_id, driver_name, helper_id, helper_name, helper_company,
                vehicle_number, destination, customer
         FROM reference_list
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(ReferenceRow {
            driver_id: row.get(0)?,
            driver_name: row.get(1)?,
            helper_id: row.get(2)?,
            helper_name: row.get(3)?,
            helper_company: row.get(4)?,
            vehicle_number: row.get(5)?,
            destination: row.get(6)?,
            customer: row.get(7)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Replace the whole reference table in one transaction.
pub fn replace_reference_rows(conn: &Connection, rows: &[ReferenceRow]) -> AppResult<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM reference_list", [])?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO reference_list (driver_id, driver_name, helper_id, helper_name,
                 helper_company, vehicle_number, destination, customer)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for r in rows {
            stmt.execute(params![
                r.driver_id.trim(),
                r.driver_name.trim(),
                r.helper_id.trim(),
                r.helper_name.trim(),
                r.helper_company.trim(),
                r.vehicle_number.trim(),
                r.destination.trim(),
                r.customer.trim(),
            ])?;
        }
    }

    tx.commit()?;
    Ok(rows.len())
}
