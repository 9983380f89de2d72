//! Shift lifecycle: the four stages a driver submits during a shift.
//!
//! ```text
//! (idle) --start--> Arrived --depart--> Departed --last drop--> LastDropSubmitted --end--> Complete
//!                      \_____________________last drop____________/
//! ```
//!
//! Every transition re-reads the record through the store; nothing is
//! cached between calls.

use crate::core::calculator::duration::shift_hours;
use crate::db::store::{Appended, ShiftStore};
use crate::errors::{AppError, AppResult};
use crate::models::column::{Column, FieldValue};
use crate::models::input::{
    DepartureInput, LastDropInput, NumberOrText, ShiftEndInput, StartShiftInput,
};
use crate::models::shift::ShiftRecord;
use crate::models::stage::ShiftStage;
use crate::photo::{PhotoStore, persist_photo};
use crate::utils::time::{CivilClock, format_civil, format_civil_seconds, parse_civil};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOutcome {
    pub row_id: String,
    pub arrival_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureOutcome {
    pub departure_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastDropOutcome {
    pub last_drop_time: String,
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOutcome {
    pub shift_duration: f64,
    pub overtime: f64,
    pub departure_auto_filled: bool,
}

/// One entry of a stage pick-list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingShift {
    pub row_id: String,
    pub driver_id: String,
    pub driver_name: String,
    pub vehicle_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_company: Option<String>,
    pub arrival_time: String,
    pub departure_time: Option<String>,
    pub has_departure: bool,
    pub last_drop_submitted_at: Option<String>,
    pub current_stage: u8,
}

impl PendingShift {
    fn from_record(r: &ShiftRecord) -> Self {
        Self {
            row_id: r.row_id.clone(),
            driver_id: r.driver_id.clone(),
            driver_name: r.driver_name.clone(),
            vehicle_number: r.vehicle_number.clone(),
            helper_name: r.helper_name.clone(),
            helper_company: r.helper_company.clone(),
            arrival_time: format_civil(&r.arrival_at_gate),
            departure_time: r.departure_from_warehouse.as_ref().map(format_civil),
            has_departure: r.has_departure(),
            last_drop_submitted_at: r
                .last_drop_submit_timestamp
                .as_ref()
                .map(format_civil_seconds),
            current_stage: r.stage.number(),
        }
    }
}

/// Case-insensitive by name, exact spelling as tiebreak.
pub fn sort_by_driver_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| {
        let (a, b) = (name(a), name(b));
        a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
    });
}

pub struct ShiftLogic<'a> {
    store: &'a dyn ShiftStore,
    photos: &'a dyn PhotoStore,
    clock: CivilClock,
    overtime_threshold: f64,
}

fn required_time(value: Option<&str>, what: &str) -> AppResult<NaiveDateTime> {
    let raw = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{what} is required.")))?;

    parse_civil(raw).ok_or_else(|| {
        AppError::Validation(format!(
            "{what} '{raw}' is not a valid date-time (DD/MM/YYYY HH:MM)."
        ))
    })
}

fn required_text(value: &str, what: &str) -> AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::Validation(format!("{what} is required.")));
    }
    Ok(v.to_string())
}

fn optional_text(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn non_negative(value: Option<&NumberOrText>, what: &str) -> AppResult<f64> {
    let n = match value {
        None => 0.0,
        Some(v) => v
            .as_f64()
            .ok_or_else(|| AppError::Validation(format!("{what} must be a number.")))?,
    };
    if !n.is_finite() || n < 0.0 {
        return Err(AppError::Validation(format!(
            "{what} must be a non-negative number."
        )));
    }
    Ok(n)
}

fn count(value: Option<&NumberOrText>, what: &str) -> AppResult<u32> {
    let n = non_negative(value, what)?;
    if n.fract() != 0.0 || n > u32::MAX as f64 {
        return Err(AppError::Validation(format!("{what} must be a whole number.")));
    }
    Ok(n as u32)
}

fn stuck_message(existing: &ShiftRecord) -> String {
    let stage = existing.stage.pending_stage().unwrap_or(4);
    format!(
        "{} already has an active shift ({}, started {}) pending at Stage {}. End that shift first.",
        existing.driver_name,
        existing.row_id,
        format_civil(&existing.arrival_at_gate),
        stage
    )
}

impl<'a> ShiftLogic<'a> {
    pub fn new(
        store: &'a dyn ShiftStore,
        photos: &'a dyn PhotoStore,
        clock: CivilClock,
        overtime_threshold: f64,
    ) -> Self {
        Self {
            store,
            photos,
            clock,
            overtime_threshold,
        }
    }

    fn load(&self, row_id: &str) -> AppResult<ShiftRecord> {
        let row_id = row_id.trim();
        if row_id.is_empty() {
            return Err(AppError::Validation("Shift row ID is required.".into()));
        }
        let record = self.store.find(row_id)?.ok_or_else(|| {
            AppError::NotFound(format!(
                "Shift record {row_id} not found. Please check with your supervisor."
            ))
        })?;

        if record.is_complete() {
            return Err(AppError::Conflict(format!(
                "Shift {row_id} is already complete."
            )));
        }
        Ok(record)
    }

    /// Stage 1: arrival at the gate. Creates the record.
    pub fn start_shift(&self, input: &StartShiftInput) -> AppResult<StartOutcome> {
        let arrival = required_time(input.shift_start_time.as_deref(), "Shift start time")?;
        let driver_id = required_text(&input.driver_id, "Driver")?;
        let driver_name = required_text(&input.driver_name, "Driver name")?;
        let vehicle_number = required_text(&input.vehicle_number, "Vehicle number")?;
        let start_odometer = non_negative(input.start_odometer.as_ref(), "Start odometer")?;
        let total_drops = count(input.total_drops.as_ref(), "Total drops")?;

        // Friendly check first, so a blocked driver does not upload a photo.
        if let Some(open) = self
            .store
            .scan()?
            .into_iter()
            .find(|r| r.driver_id == driver_id && !r.is_complete())
        {
            return Err(AppError::Conflict(stuck_message(&open)));
        }

        let row_id = format!(
            "SHIFT-{}-{}",
            self.clock.now().format("%Y%m%d-%H%M%S"),
            driver_id
        );

        let photo_url = persist_photo(
            self.photos,
            input.start_photo_base64.as_deref(),
            &format!("{row_id}_start.jpg"),
            "Start odometer",
        )?;

        let record = ShiftRecord {
            row_id: row_id.clone(),
            shift_date: arrival.date(),
            driver_id,
            driver_name,
            helper_id: optional_text(input.helper_id.as_ref()),
            helper_name: optional_text(input.helper_name.as_ref()),
            helper_company: optional_text(input.helper_company.as_ref()),
            vehicle_number,
            start_odometer,
            start_photo_url: photo_url,
            fuel_taken: optional_text(input.fuel_taken.as_ref()),
            destination_emirate: optional_text(input.destination_emirate.as_ref())
                .unwrap_or_default(),
            primary_customer: optional_text(input.primary_customer.as_ref()).unwrap_or_default(),
            total_drops,
            arrival_at_gate: arrival,
            departure_from_warehouse: None,
            last_drop_time: None,
            last_drop_photo_url: None,
            last_drop_submit_timestamp: None,
            failed_drops: None,
            shift_complete_time: None,
            end_odometer: None,
            end_photo_url: None,
            shift_duration_hours: None,
            overtime_hours: None,
            stage: ShiftStage::Arrived,
            departure_auto: false,
        };

        match self.store.append_if_idle(&record)? {
            Appended::Inserted => Ok(StartOutcome {
                row_id,
                arrival_time: format_civil(&arrival),
            }),
            Appended::Blocked(open) => Err(AppError::Conflict(stuck_message(&open))),
        }
    }

    /// Stage 2: departure from the warehouse. A repeated call overwrites.
    pub fn record_departure(&self, input: &DepartureInput) -> AppResult<DepartureOutcome> {
        let departure = required_time(input.departure_time.as_deref(), "Departure time")?;
        let record = self.load(&input.row_id)?;

        self.store.update(
            &record.row_id,
            &[
                (Column::DepartureFromWarehouse, FieldValue::DateTime(departure)),
                (
                    Column::Stage,
                    FieldValue::Text(record.stage.after_departure().to_db_str().into()),
                ),
            ],
        )?;

        Ok(DepartureOutcome {
            departure_time: format_civil(&departure),
        })
    }

    /// Stage 3: last drop. The submit timestamp is the server clock.
    pub fn record_last_drop(&self, input: &LastDropInput) -> AppResult<LastDropOutcome> {
        let last_drop = required_time(input.last_drop_time.as_deref(), "Last drop time")?;
        let failed = count(input.failed_drops.as_ref(), "Failed drops")?;
        let record = self.load(&input.row_id)?;

        let photo_url = persist_photo(
            self.photos,
            input.last_drop_photo_base64.as_deref(),
            &format!("{}_lastdrop.jpg", record.row_id),
            "Last drop",
        )?;

        let submitted_at = self.clock.now();

        self.store.update(
            &record.row_id,
            &[
                (Column::LastDropTime, FieldValue::DateTime(last_drop)),
                (Column::LastDropPhotoUrl, FieldValue::Text(photo_url)),
                (Column::LastDropSubmitTimestamp, FieldValue::DateTime(submitted_at)),
                (Column::FailedDrops, FieldValue::Count(failed)),
                (
                    Column::Stage,
                    FieldValue::Text(ShiftStage::LastDropSubmitted.to_db_str().into()),
                ),
            ],
        )?;

        Ok(LastDropOutcome {
            last_drop_time: format_civil(&last_drop),
            submitted_at: format_civil_seconds(&submitted_at),
        })
    }

    /// Stage 4: shift complete. Backfills a skipped departure and finalizes
    /// duration and overtime, always measured from the gate arrival.
    pub fn complete_shift(&self, input: &ShiftEndInput) -> AppResult<EndOutcome> {
        let complete = required_time(input.shift_complete_time.as_deref(), "Shift complete time")?;
        let end_odometer = non_negative(input.end_odometer.as_ref(), "End odometer")?;
        let record = self.load(&input.row_id)?;

        if complete < record.arrival_at_gate {
            return Err(AppError::Validation(format!(
                "Shift complete time {} is before the arrival at {}.",
                format_civil(&complete),
                format_civil(&record.arrival_at_gate)
            )));
        }

        let photo_url = persist_photo(
            self.photos,
            input.end_photo_base64.as_deref(),
            &format!("{}_end.jpg", record.row_id),
            "End odometer",
        )?;

        let hours = shift_hours(&record.arrival_at_gate, &complete, self.overtime_threshold);

        let mut fields = Vec::with_capacity(8);
        let backfill = !record.has_departure();
        if backfill {
            fields.push((Column::DepartureFromWarehouse, FieldValue::DateTime(complete)));
            fields.push((Column::DepartureAuto, FieldValue::Flag(true)));
        }
        fields.extend([
            (Column::ShiftCompleteTime, FieldValue::DateTime(complete)),
            (Column::EndOdometer, FieldValue::Number(end_odometer)),
            (Column::EndPhotoUrl, FieldValue::Text(photo_url)),
            (Column::ShiftDurationHours, FieldValue::Number(hours.duration)),
            (Column::OvertimeHours, FieldValue::Number(hours.overtime)),
            (
                Column::Stage,
                FieldValue::Text(ShiftStage::Complete.to_db_str().into()),
            ),
        ]);

        self.store.update(&record.row_id, &fields)?;

        Ok(EndOutcome {
            shift_duration: hours.duration,
            overtime: hours.overtime,
            departure_auto_filled: backfill,
        })
    }

    /// Drivers waiting to submit `stage` (2, 3 or 4).
    ///
    /// Stage 2 only looks at shifts dated today or yesterday; stages 3 and 4
    /// have no date window.
    pub fn list_pending(&self, stage: u8) -> AppResult<Vec<PendingShift>> {
        let today = self.clock.today();
        let yesterday = self.clock.yesterday();

        let keep: Box<dyn Fn(&ShiftRecord) -> bool> = match stage {
            2 => Box::new(move |r: &ShiftRecord| {
                !r.has_departure() && (r.shift_date == today || r.shift_date == yesterday)
            }),
            3 => Box::new(|r: &ShiftRecord| !r.has_last_drop_submit()),
            4 => Box::new(|r: &ShiftRecord| r.has_last_drop_submit()),
            other => {
                return Err(AppError::InvalidStage(format!(
                    "{other} (pending lists exist for stages 2, 3 and 4)"
                )));
            }
        };

        let mut out: Vec<PendingShift> = self
            .store
            .scan()?
            .iter()
            .filter(|r| !r.is_complete() && keep(*r))
            .map(PendingShift::from_record)
            .collect();

        sort_by_driver_name(&mut out, |p| p.driver_name.as_str());
        Ok(out)
    }
}
