use super::stage::ShiftStage;
use chrono::{NaiveDate, NaiveDateTime};

/// One row of the shift table: a single shift attempt of one driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftRecord {
    pub row_id: String,
    pub shift_date: NaiveDate,
    pub driver_id: String,
    pub driver_name: String,
    pub helper_id: Option<String>,
    pub helper_name: Option<String>,
    pub helper_company: Option<String>,
    pub vehicle_number: String,
    pub start_odometer: f64,
    pub start_photo_url: String,
    pub fuel_taken: Option<String>,
    pub destination_emirate: String,
    pub primary_customer: String,
    pub total_drops: u32,
    pub arrival_at_gate: NaiveDateTime,
    pub departure_from_warehouse: Option<NaiveDateTime>,
    pub last_drop_time: Option<NaiveDateTime>,
    pub last_drop_photo_url: Option<String>,
    pub last_drop_submit_timestamp: Option<NaiveDateTime>, // server clock, never user input
    pub failed_drops: Option<u32>,
    pub shift_complete_time: Option<NaiveDateTime>,
    pub end_odometer: Option<f64>,
    pub end_photo_url: Option<String>,
    pub shift_duration_hours: Option<f64>,
    pub overtime_hours: Option<f64>,

    pub stage: ShiftStage,
    pub departure_auto: bool, // departure copied from shift_complete_time
}

impl ShiftRecord {
    pub fn is_complete(&self) -> bool {
        self.stage.is_complete()
    }

    pub fn has_departure(&self) -> bool {
        self.departure_from_warehouse.is_some()
    }

    pub fn has_last_drop_submit(&self) -> bool {
        self.last_drop_submit_timestamp.is_some()
    }

    pub fn duration(&self) -> f64 {
        self.shift_duration_hours.unwrap_or(0.0)
    }

    pub fn overtime(&self) -> f64 {
        self.overtime_hours.unwrap_or(0.0)
    }

    pub fn failed(&self) -> u32 {
        self.failed_drops.unwrap_or(0)
    }

    /// Completed with a positive duration: the only rows that feed
    /// hour-based aggregates.
    pub fn counts_as_completed(&self) -> bool {
        self.is_complete() && self.duration() > 0.0
    }

    /// Departure that was actually submitted, not backfilled.
    pub fn recorded_departure(&self) -> Option<NaiveDateTime> {
        if self.departure_auto || self.departure_from_warehouse == self.shift_complete_time {
            None
        } else {
            self.departure_from_warehouse
        }
    }

    pub fn helper_company_name(&self) -> Option<&str> {
        self.helper_company
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
