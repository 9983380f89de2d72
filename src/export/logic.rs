use crate::db::store::ShiftStore;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::ShiftExport;
use crate::export::range::parse_range;
use crate::ui::messages::warning;
use crate::utils::path::require_absolute;
use chrono::NaiveDate;

pub struct ExportLogic;

impl ExportLogic {
    /// Export shift records whose shift date falls in `range`.
    ///
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"` or `YYYY`, `YYYY-MM`, `YYYY-MM-DD`,
    ///   optionally as `start:end`
    ///
    /// Returns the number of rows written.
    pub fn export(
        store: &dyn ShiftStore,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = require_absolute(file, "Output file path")?;
        ensure_writable(&path, force)?;

        let bounds: Option<(NaiveDate, NaiveDate)> = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        let rows = Self::rows(store, bounds)?;
        if rows.is_empty() {
            warning("No shifts found for the selected range.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, &path)?,
            ExportFormat::Json => export_json(&rows, &path)?,
        }
        Ok(rows.len())
    }

    /// Rows in insertion order, filtered on the shift date.
    pub fn rows(
        store: &dyn ShiftStore,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<Vec<ShiftExport>> {
        Ok(store
            .scan()?
            .iter()
            .filter(|r| match bounds {
                Some((from, to)) => r.shift_date >= from && r.shift_date <= to,
                None => true,
            })
            .map(ShiftExport::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use crate::db::store::SqliteShiftStore;
    use crate::models::column::Column;
    use crate::models::shift::ShiftRecord;
    use crate::models::stage::ShiftStage;
    use crate::utils::time::parse_civil;
    use std::env;
    use std::fs;

    fn record(row_id: &str, arrival: &str) -> ShiftRecord {
        let arrival = parse_civil(arrival).unwrap();
        ShiftRecord {
            row_id: row_id.into(),
            shift_date: arrival.date(),
            driver_id: "D1".into(),
            driver_name: "Ali".into(),
            helper_id: None,
            helper_name: None,
            helper_company: None,
            vehicle_number: "V1".into(),
            start_odometer: 10.0,
            start_photo_url: "file:///p.jpg".into(),
            fuel_taken: None,
            destination_emirate: "Dubai".into(),
            primary_customer: "Noon".into(),
            total_drops: 3,
            arrival_at_gate: arrival,
            departure_from_warehouse: None,
            last_drop_time: None,
            last_drop_photo_url: None,
            last_drop_submit_timestamp: None,
            failed_drops: None,
            shift_complete_time: Some(arrival),
            end_odometer: None,
            end_photo_url: None,
            shift_duration_hours: None,
            overtime_hours: None,
            stage: ShiftStage::Complete,
            departure_auto: false,
        }
    }

    fn seeded() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        let store = SqliteShiftStore::new(&pool.conn);
        store.append_if_idle(&record("R1", "15/01/2024 08:00")).unwrap();
        store.append_if_idle(&record("R2", "03/02/2024 08:00")).unwrap();
        pool
    }

    #[test]
    fn csv_header_follows_the_sheet_columns() {
        let pool = seeded();
        let store = SqliteShiftStore::new(&pool.conn);
        let path = env::temp_dir().join("drivershift_export_header.csv");
        let _ = fs::remove_file(&path);

        let n = ExportLogic::export(
            &store,
            ExportFormat::Csv,
            path.to_str().unwrap(),
            Some("2024-01"),
            false,
        )
        .unwrap();
        assert_eq!(n, 1);

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        let expected: Vec<&str> = Column::SHEET.iter().map(|c| c.header()).collect();
        assert_eq!(header, expected.join(","));
        assert!(content.contains("R1") && !content.contains("R2"));

        // existing file needs --force
        assert!(
            ExportLogic::export(&store, ExportFormat::Csv, path.to_str().unwrap(), None, false)
                .is_err()
        );
        assert_eq!(
            ExportLogic::export(&store, ExportFormat::Json, path.to_str().unwrap(), None, true)
                .unwrap(),
            2
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn relative_output_is_rejected() {
        let pool = seeded();
        let store = SqliteShiftStore::new(&pool.conn);
        assert!(ExportLogic::export(&store, ExportFormat::Json, "out.json", None, true).is_err());
    }
}
