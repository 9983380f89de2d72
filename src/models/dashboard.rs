//! Output shapes of the dashboard queries. Every type defaults to its
//! zero value so an empty table still renders a complete dashboard.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub active_count: usize,
    pub active_drivers: Vec<ActiveDriver>,
    pub punch_out_misses: Vec<PunchOutMiss>,
    pub vehicle_run_time: Vec<VehicleHours>,
    pub shift_trend_by_date: Vec<TrendPoint>,
    pub failed_drops_by_date: Vec<FailedDropsDay>,
    pub overtime_by_date: Vec<OvertimeDay>,
    pub today_stats: TodayStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDriver {
    pub row_id: String,
    pub driver_id: String,
    pub driver_name: String,
    pub vehicle_number: String,
    pub arrival_time: String,
    pub departure_time: Option<String>,
    pub current_stage: u8,
    pub running_hours: f64,
    pub is_overtime: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PunchOutMiss {
    pub row_id: String,
    pub shift_date: String,
    pub driver_id: String,
    pub driver_name: String,
    pub vehicle_number: String,
    pub stuck_stage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleHours {
    pub vehicle_number: String,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String,
    pub shift_count: usize,
    pub avg_duration: f64,
    pub total_overtime: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedDropsDay {
    pub date: String,
    pub total_drops: u64,
    pub failed_drops: u64,
    pub failure_rate: f64,
    pub drivers: Vec<DriverDrops>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDrops {
    pub driver_id: String,
    pub driver_name: String,
    pub total_drops: u64,
    pub failed_drops: u64,
    pub failure_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeDay {
    pub date: String,
    pub total_overtime: f64,
    pub drivers: Vec<DriverOvertime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverOvertime {
    pub driver_id: String,
    pub driver_name: String,
    pub overtime_hours: f64,
    pub shift_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub avg_shift_duration: f64,
    pub total_failed_drops: u64,
    pub top_helper_companies: Vec<HelperCompanyCount>,
    pub completed_shifts_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelperCompanyCount {
    pub company: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDetail {
    pub date: String,
    pub vehicle_km: Vec<VehicleKm>,
    pub stage_gaps: Vec<StageGaps>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleKm {
    pub vehicle_number: String,
    pub total_km: f64,
}

/// Hours spent between consecutive stages of one shift.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageGaps {
    pub row_id: String,
    pub driver_id: String,
    pub driver_name: String,
    pub vehicle_number: String,
    pub arrival_to_departure: Option<f64>,
    pub departure_to_last_drop: Option<f64>,
    pub last_drop_to_complete: Option<f64>,
    pub departure_auto_filled: bool,
    pub is_complete: bool,
}
