//! Shift record repository.
//!
//! The lifecycle and dashboard engines only see the `ShiftStore` trait:
//! append, full scan, point lookup by row id and partial field updates.
//! No caching happens here; every call reads the table again.

use crate::errors::{AppError, AppResult};
use crate::models::column::{Column, FieldValue};
use crate::models::shift::ShiftRecord;
use crate::models::stage::ShiftStage;
use crate::utils::date::DB_DATE;
use crate::utils::time::DB_DATETIME;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, TransactionBehavior, params};

/// Outcome of a conditional append.
#[derive(Debug)]
pub enum Appended {
    Inserted,
    /// The driver still has this incomplete shift; nothing was written.
    Blocked(Box<ShiftRecord>),
}

pub trait ShiftStore {
    /// Every record, in insertion order.
    fn scan(&self) -> AppResult<Vec<ShiftRecord>>;

    fn find(&self, row_id: &str) -> AppResult<Option<ShiftRecord>>;

    /// Append `record` unless its driver already has an incomplete shift.
    /// Check and insert happen atomically.
    fn append_if_idle(&self, record: &ShiftRecord) -> AppResult<Appended>;

    /// Overwrite the given cells of one row.
    fn update(&self, row_id: &str, fields: &[(Column, FieldValue)]) -> AppResult<()>;
}

pub struct SqliteShiftStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteShiftStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

const SELECT_ALL: &str = "SELECT * FROM shifts";

fn conversion_error(col: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        col,
        Type::Text,
        Box::new(AppError::InvalidDateTime(msg)),
    )
}

fn get_date(row: &Row, col: Column) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(col.db_name())?;
    NaiveDate::parse_from_str(&raw, DB_DATE)
        .map_err(|_| conversion_error(0, format!("{} = '{}'", col.db_name(), raw)))
}

fn get_datetime(row: &Row, col: Column) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(col.db_name())?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDateTime::parse_from_str(&s, DB_DATETIME)
            .map(Some)
            .map_err(|_| conversion_error(0, format!("{} = '{}'", col.db_name(), s))),
    }
}

fn get_text(row: &Row, col: Column) -> rusqlite::Result<Option<String>> {
    let raw: Option<String> = row.get(col.db_name())?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

pub fn map_row(row: &Row) -> rusqlite::Result<ShiftRecord> {
    let stage_str: String = row.get(Column::Stage.db_name())?;
    let stage = ShiftStage::from_db_str(&stage_str)
        .ok_or_else(|| conversion_error(0, format!("stage = '{}'", stage_str)))?;

    let arrival = get_datetime(row, Column::ArrivalAtGate)?
        .ok_or_else(|| conversion_error(0, "arrival_at_gate is empty".into()))?;

    Ok(ShiftRecord {
        row_id: row.get(Column::RowId.db_name())?,
        shift_date: get_date(row, Column::ShiftDate)?,
        driver_id: row.get(Column::DriverId.db_name())?,
        driver_name: row.get(Column::DriverName.db_name())?,
        helper_id: get_text(row, Column::HelperId)?,
        helper_name: get_text(row, Column::HelperName)?,
        helper_company: get_text(row, Column::HelperCompany)?,
        vehicle_number: row.get(Column::VehicleNumber.db_name())?,
        start_odometer: row.get(Column::StartOdometer.db_name())?,
        start_photo_url: row.get(Column::StartPhotoUrl.db_name())?,
        fuel_taken: get_text(row, Column::FuelTaken)?,
        destination_emirate: row.get(Column::DestinationEmirate.db_name())?,
        primary_customer: row.get(Column::PrimaryCustomer.db_name())?,
        total_drops: row.get(Column::TotalDrops.db_name())?,
        arrival_at_gate: arrival,
        departure_from_warehouse: get_datetime(row, Column::DepartureFromWarehouse)?,
        last_drop_time: get_datetime(row, Column::LastDropTime)?,
        last_drop_photo_url: get_text(row, Column::LastDropPhotoUrl)?,
        last_drop_submit_timestamp: get_datetime(row, Column::LastDropSubmitTimestamp)?,
        failed_drops: row.get(Column::FailedDrops.db_name())?,
        shift_complete_time: get_datetime(row, Column::ShiftCompleteTime)?,
        end_odometer: row.get(Column::EndOdometer.db_name())?,
        end_photo_url: get_text(row, Column::EndPhotoUrl)?,
        shift_duration_hours: row.get(Column::ShiftDurationHours.db_name())?,
        overtime_hours: row.get(Column::OvertimeHours.db_name())?,
        stage,
        departure_auto: row.get::<_, i32>(Column::DepartureAuto.db_name())? == 1,
    })
}

/// Insert a freshly created (stage 1) record.
fn insert_record(conn: &Connection, r: &ShiftRecord) -> AppResult<()> {
    let res = conn.execute(
        "INSERT INTO shifts (
            row_id, shift_date, driver_id, driver_name,
            helper_id, helper_name, helper_company, vehicle_number,
            start_odometer, start_photo_url, fuel_taken,
            destination_emirate, primary_customer, total_drops,
            arrival_at_gate, stage, departure_auto
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, 0)",
        params![
            r.row_id,
            FieldValue::Date(r.shift_date),
            r.driver_id,
            r.driver_name,
            r.helper_id,
            r.helper_name,
            r.helper_company,
            r.vehicle_number,
            r.start_odometer,
            r.start_photo_url,
            r.fuel_taken,
            r.destination_emirate,
            r.primary_customer,
            r.total_drops,
            FieldValue::DateTime(r.arrival_at_gate),
            r.stage.to_db_str(),
        ],
    );

    match res {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(AppError::Conflict(format!(
                "Shift {} already exists. Please try again in a moment.",
                r.row_id
            )))
        }
        Err(e) => Err(e.into()),
    }
}

impl ShiftStore for SqliteShiftStore<'_> {
    fn scan(&self) -> AppResult<Vec<ShiftRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_ALL} ORDER BY rowid ASC"))?;
        let rows = stmt.query_map([], map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn find(&self, row_id: &str) -> AppResult<Option<ShiftRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_ALL} WHERE row_id = ?1"))?;
        Ok(stmt.query_row([row_id], map_row).optional()?)
    }

    fn append_if_idle(&self, record: &ShiftRecord) -> AppResult<Appended> {
        // IMMEDIATE takes the write lock before the check, so two writers
        // cannot both see the driver as idle.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let open = {
            let mut stmt = tx.prepare(&format!(
                "{SELECT_ALL} WHERE driver_id = ?1 AND stage <> 'complete' ORDER BY rowid ASC LIMIT 1"
            ))?;
            stmt.query_row([&record.driver_id], map_row).optional()?
        };

        if let Some(existing) = open {
            tx.rollback()?;
            return Ok(Appended::Blocked(Box::new(existing)));
        }

        insert_record(&tx, record)?;
        tx.commit()?;
        Ok(Appended::Inserted)
    }

    fn update(&self, row_id: &str, fields: &[(Column, FieldValue)]) -> AppResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        if fields.iter().any(|(c, _)| *c == Column::RowId) {
            return Err(AppError::Validation("Row ID cannot be changed.".into()));
        }

        let assignments: Vec<String> = fields
            .iter()
            .enumerate()
            .map(|(i, (col, _))| format!("{} = ?{}", col.db_name(), i + 1))
            .collect();

        let sql = format!(
            "UPDATE shifts SET {} WHERE row_id = ?{}",
            assignments.join(", "),
            fields.len() + 1
        );

        let mut values: Vec<&dyn rusqlite::ToSql> = fields
            .iter()
            .map(|(_, v)| v as &dyn rusqlite::ToSql)
            .collect();
        values.push(&row_id);

        let changed = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values))?;

        if changed == 0 {
            return Err(AppError::NotFound(format!("Shift {} not found.", row_id)));
        }
        Ok(())
    }
}
