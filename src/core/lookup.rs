use crate::db::reference::{load_reference_rows, replace_reference_rows};
use crate::errors::{AppError, AppResult};
use crate::models::lookup::{Driver, Helper, LookupData, ReferenceRow, Vehicle};
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::Path;

pub struct LookupLogic;

fn push_unique(seen: &mut HashSet<String>, key: &str) -> bool {
    !key.is_empty() && seen.insert(key.to_string())
}

impl LookupLogic {
    /// Pick-lists for the forms, deduplicated in first-seen order.
    pub fn collect(rows: &[ReferenceRow]) -> LookupData {
        let mut data = LookupData::default();
        let mut drivers = HashSet::new();
        let mut helpers = HashSet::new();
        let mut vehicles = HashSet::new();
        let mut destinations = HashSet::new();
        let mut customers = HashSet::new();

        for r in rows {
            let (id, name) = (r.driver_id.trim(), r.driver_name.trim());
            if !name.is_empty() && push_unique(&mut drivers, id) {
                data.drivers.push(Driver {
                    id: id.to_string(),
                    name: name.to_string(),
                });
            }

            let (id, name) = (r.helper_id.trim(), r.helper_name.trim());
            if !name.is_empty() && push_unique(&mut helpers, id) {
                data.helpers.push(Helper {
                    id: id.to_string(),
                    name: name.to_string(),
                    company: r.helper_company.trim().to_string(),
                });
            }

            let vehicle = r.vehicle_number.trim();
            if push_unique(&mut vehicles, vehicle) {
                data.vehicles.push(Vehicle {
                    number: vehicle.to_string(),
                });
            }

            let destination = r.destination.trim();
            if push_unique(&mut destinations, destination) {
                data.destinations.push(destination.to_string());
            }

            let customer = r.customer.trim();
            if push_unique(&mut customers, customer) {
                data.customers.push(customer.to_string());
            }
        }

        data
    }

    pub fn load(conn: &Connection) -> AppResult<LookupData> {
        Ok(Self::collect(&load_reference_rows(conn)?))
    }

    /// Replace the reference table with the rows of a headed CSV file.
    /// Returns the number of rows imported.
    pub fn import_csv(conn: &Connection, path: &Path) -> AppResult<usize> {
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "Reference file not found: {}",
                path.display()
            )));
        }

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for rec in rdr.deserialize::<ReferenceRow>() {
            rows.push(rec?);
        }

        replace_reference_rows(conn, &rows)
    }
}
