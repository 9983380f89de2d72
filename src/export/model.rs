use crate::models::shift::ShiftRecord;
use crate::utils::date::format_date;
use crate::utils::time::{format_civil, format_civil_seconds};
use serde::Serialize;

/// Flat export row: the 25 shift table columns under their header labels.
#[derive(Serialize, Clone, Debug)]
pub struct ShiftExport {
    #[serde(rename = "Row ID")]
    pub row_id: String,
    #[serde(rename = "Shift Date")]
    pub shift_date: String,
    #[serde(rename = "Driver Employee ID")]
    pub driver_id: String,
    #[serde(rename = "Driver Name")]
    pub driver_name: String,
    #[serde(rename = "Helper Employee ID")]
    pub helper_id: String,
    #[serde(rename = "Helper Name")]
    pub helper_name: String,
    #[serde(rename = "Helper Company")]
    pub helper_company: String,
    #[serde(rename = "Vehicle Number")]
    pub vehicle_number: String,
    #[serde(rename = "Start Odometer (km)")]
    pub start_odometer: f64,
    #[serde(rename = "Start Odometer Photo URL")]
    pub start_photo_url: String,
    #[serde(rename = "Fuel Taken")]
    pub fuel_taken: String,
    #[serde(rename = "Destination Emirate")]
    pub destination_emirate: String,
    #[serde(rename = "Primary Customer")]
    pub primary_customer: String,
    #[serde(rename = "Total Drops")]
    pub total_drops: u32,
    #[serde(rename = "Arrival at Gate")]
    pub arrival_at_gate: String,
    #[serde(rename = "Departure from Warehouse")]
    pub departure_from_warehouse: String,
    #[serde(rename = "Last Drop Date & Time")]
    pub last_drop_time: String,
    #[serde(rename = "Last Drop Photo URL")]
    pub last_drop_photo_url: String,
    #[serde(rename = "Last Drop Submitted At")]
    pub last_drop_submit_timestamp: String,
    #[serde(rename = "Number of Failed Drops")]
    pub failed_drops: Option<u32>,
    #[serde(rename = "Shift Complete Date & Time")]
    pub shift_complete_time: String,
    #[serde(rename = "End Odometer (km)")]
    pub end_odometer: Option<f64>,
    #[serde(rename = "End Odometer Photo URL")]
    pub end_photo_url: String,
    #[serde(rename = "Shift Duration (hrs)")]
    pub shift_duration_hours: Option<f64>,
    #[serde(rename = "Overtime Hours")]
    pub overtime_hours: Option<f64>,
}

fn text(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

impl From<&ShiftRecord> for ShiftExport {
    fn from(r: &ShiftRecord) -> Self {
        let civil = |dt: &Option<chrono::NaiveDateTime>| dt.as_ref().map(format_civil).unwrap_or_default();
        Self {
            row_id: r.row_id.clone(),
            shift_date: format_date(&r.shift_date),
            driver_id: r.driver_id.clone(),
            driver_name: r.driver_name.clone(),
            helper_id: text(&r.helper_id),
            helper_name: text(&r.helper_name),
            helper_company: text(&r.helper_company),
            vehicle_number: r.vehicle_number.clone(),
            start_odometer: r.start_odometer,
            start_photo_url: r.start_photo_url.clone(),
            fuel_taken: text(&r.fuel_taken),
            destination_emirate: r.destination_emirate.clone(),
            primary_customer: r.primary_customer.clone(),
            total_drops: r.total_drops,
            arrival_at_gate: format_civil(&r.arrival_at_gate),
            departure_from_warehouse: civil(&r.departure_from_warehouse),
            last_drop_time: civil(&r.last_drop_time),
            last_drop_photo_url: text(&r.last_drop_photo_url),
            last_drop_submit_timestamp: r
                .last_drop_submit_timestamp
                .as_ref()
                .map(format_civil_seconds)
                .unwrap_or_default(),
            failed_drops: r.failed_drops,
            shift_complete_time: civil(&r.shift_complete_time),
            end_odometer: r.end_odometer,
            end_photo_url: text(&r.end_photo_url),
            shift_duration_hours: r.shift_duration_hours,
            overtime_hours: r.overtime_hours,
        }
    }
}
