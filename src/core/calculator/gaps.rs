use super::rounding::round2;
use crate::models::dashboard::StageGaps;
use crate::models::shift::ShiftRecord;
use crate::utils::time::hours_between;
use chrono::NaiveDateTime;

fn gap(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Option<f64> {
    match (from, to) {
        (Some(a), Some(b)) => Some(round2(hours_between(&a, &b))),
        _ => None,
    }
}

/// Stage-to-stage timings of one shift.
///
/// A backfilled departure is not a real event, so both gaps that touch it
/// are reported as `None`.
pub fn stage_gaps(r: &ShiftRecord) -> StageGaps {
    let departure = r.recorded_departure();
    let auto_filled = r.has_departure() && departure.is_none();

    StageGaps {
        row_id: r.row_id.clone(),
        driver_id: r.driver_id.clone(),
        driver_name: r.driver_name.clone(),
        vehicle_number: r.vehicle_number.clone(),
        arrival_to_departure: gap(Some(r.arrival_at_gate), departure),
        departure_to_last_drop: gap(departure, r.last_drop_submit_timestamp),
        last_drop_to_complete: gap(r.last_drop_submit_timestamp, r.shift_complete_time),
        departure_auto_filled: auto_filled,
        is_complete: r.is_complete(),
    }
}
