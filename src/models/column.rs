//! Fixed column layout of the shift table (A–Y) plus the two internal
//! columns that carry the explicit lifecycle state.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;

use crate::utils::date::db_date;
use crate::utils::time::db_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    RowId,
    ShiftDate,
    DriverId,
    DriverName,
    HelperId,
    HelperName,
    HelperCompany,
    VehicleNumber,
    StartOdometer,
    StartPhotoUrl,
    FuelTaken,
    DestinationEmirate,
    PrimaryCustomer,
    TotalDrops,
    ArrivalAtGate,
    DepartureFromWarehouse,
    LastDropTime,
    LastDropPhotoUrl,
    LastDropSubmitTimestamp,
    FailedDrops,
    ShiftCompleteTime,
    EndOdometer,
    EndPhotoUrl,
    ShiftDurationHours,
    OvertimeHours,
    // internal
    Stage,
    DepartureAuto,
}

impl Column {
    /// The 25 sheet columns in A–Y order.
    pub const SHEET: [Column; 25] = [
        Column::RowId,
        Column::ShiftDate,
        Column::DriverId,
        Column::DriverName,
        Column::HelperId,
        Column::HelperName,
        Column::HelperCompany,
        Column::VehicleNumber,
        Column::StartOdometer,
        Column::StartPhotoUrl,
        Column::FuelTaken,
        Column::DestinationEmirate,
        Column::PrimaryCustomer,
        Column::TotalDrops,
        Column::ArrivalAtGate,
        Column::DepartureFromWarehouse,
        Column::LastDropTime,
        Column::LastDropPhotoUrl,
        Column::LastDropSubmitTimestamp,
        Column::FailedDrops,
        Column::ShiftCompleteTime,
        Column::EndOdometer,
        Column::EndPhotoUrl,
        Column::ShiftDurationHours,
        Column::OvertimeHours,
    ];

    pub fn db_name(&self) -> &'static str {
        match self {
            Column::RowId => "row_id",
            Column::ShiftDate => "shift_date",
            Column::DriverId => "driver_id",
            Column::DriverName => "driver_name",
            Column::HelperId => "helper_id",
            Column::HelperName => "helper_name",
            Column::HelperCompany => "helper_company",
            Column::VehicleNumber => "vehicle_number",
            Column::StartOdometer => "start_odometer",
            Column::StartPhotoUrl => "start_photo_url",
            Column::FuelTaken => "fuel_taken",
            Column::DestinationEmirate => "destination_emirate",
            Column::PrimaryCustomer => "primary_customer",
            Column::TotalDrops => "total_drops",
            Column::ArrivalAtGate => "arrival_at_gate",
            Column::DepartureFromWarehouse => "departure_from_warehouse",
            Column::LastDropTime => "last_drop_time",
            Column::LastDropPhotoUrl => "last_drop_photo_url",
            Column::LastDropSubmitTimestamp => "last_drop_submit_timestamp",
            Column::FailedDrops => "failed_drops",
            Column::ShiftCompleteTime => "shift_complete_time",
            Column::EndOdometer => "end_odometer",
            Column::EndPhotoUrl => "end_photo_url",
            Column::ShiftDurationHours => "shift_duration_hours",
            Column::OvertimeHours => "overtime_hours",
            Column::Stage => "stage",
            Column::DepartureAuto => "departure_auto",
        }
    }

    /// Header label shown in exports.
    pub fn header(&self) -> &'static str {
        match self {
            Column::RowId => "Row ID",
            Column::ShiftDate => "Shift Date",
            Column::DriverId => "Driver Employee ID",
            Column::DriverName => "Driver Name",
            Column::HelperId => "Helper Employee ID",
            Column::HelperName => "Helper Name",
            Column::HelperCompany => "Helper Company",
            Column::VehicleNumber => "Vehicle Number",
            Column::StartOdometer => "Start Odometer (km)",
            Column::StartPhotoUrl => "Start Odometer Photo URL",
            Column::FuelTaken => "Fuel Taken",
            Column::DestinationEmirate => "Destination Emirate",
            Column::PrimaryCustomer => "Primary Customer",
            Column::TotalDrops => "Total Drops",
            Column::ArrivalAtGate => "Arrival at Gate",
            Column::DepartureFromWarehouse => "Departure from Warehouse",
            Column::LastDropTime => "Last Drop Date & Time",
            Column::LastDropPhotoUrl => "Last Drop Photo URL",
            Column::LastDropSubmitTimestamp => "Last Drop Submitted At",
            Column::FailedDrops => "Number of Failed Drops",
            Column::ShiftCompleteTime => "Shift Complete Date & Time",
            Column::EndOdometer => "End Odometer (km)",
            Column::EndPhotoUrl => "End Odometer Photo URL",
            Column::ShiftDurationHours => "Shift Duration (hrs)",
            Column::OvertimeHours => "Overtime Hours",
            Column::Stage => "Stage",
            Column::DepartureAuto => "Departure Auto-filled",
        }
    }
}

/// A single cell value written by a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Count(u32),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Flag(bool),
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Text(s) => ToSqlOutput::from(s.as_str()),
            FieldValue::Number(n) => ToSqlOutput::from(*n),
            FieldValue::Count(n) => ToSqlOutput::from(*n),
            FieldValue::Date(d) => ToSqlOutput::from(db_date(d)),
            FieldValue::DateTime(dt) => ToSqlOutput::from(db_datetime(dt)),
            FieldValue::Flag(b) => ToSqlOutput::from(if *b { 1 } else { 0 }),
        })
    }
}
