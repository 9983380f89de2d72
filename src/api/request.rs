use crate::models::input::{DepartureInput, LastDropInput, ShiftEndInput, StartShiftInput};
use serde::Deserialize;

/// The fixed set of operations the form layer may call, tagged by `op`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Request {
    StartShift(StartShiftInput),
    /// Drivers still waiting to record their departure.
    GetStage1PendingDrivers,
    SaveDeparture(DepartureInput),
    /// Drivers still waiting to submit their last drop.
    GetActiveDriversForEndShift,
    SaveLastDrop(LastDropInput),
    /// Drivers whose last drop is in but whose shift is not closed.
    GetStage3PendingDrivers,
    SaveShiftEnd(ShiftEndInput),
    GetDashboardData,
    GetDashboardDetailData {
        #[serde(default)]
        date: String,
    },
    GetVehicleHoursForRange {
        #[serde(default)]
        from: String,
        #[serde(default)]
        to: String,
    },
    GetInitialData,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::StartShift(_) => "startShift",
            Request::GetStage1PendingDrivers => "getStage1PendingDrivers",
            Request::SaveDeparture(_) => "saveDeparture",
            Request::GetActiveDriversForEndShift => "getActiveDriversForEndShift",
            Request::SaveLastDrop(_) => "saveLastDrop",
            Request::GetStage3PendingDrivers => "getStage3PendingDrivers",
            Request::SaveShiftEnd(_) => "saveShiftEnd",
            Request::GetDashboardData => "getDashboardData",
            Request::GetDashboardDetailData { .. } => "getDashboardDetailData",
            Request::GetVehicleHoursForRange { .. } => "getVehicleHoursForRange",
            Request::GetInitialData => "getInitialData",
        }
    }

    /// Row the request targets, for the audit log.
    pub fn target(&self) -> String {
        match self {
            Request::StartShift(i) => i.driver_id.trim().to_string(),
            Request::SaveDeparture(i) => i.row_id.trim().to_string(),
            Request::SaveLastDrop(i) => i.row_id.trim().to_string(),
            Request::SaveShiftEnd(i) => i.row_id.trim().to_string(),
            _ => String::new(),
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Request::StartShift(_)
                | Request::SaveDeparture(_)
                | Request::SaveLastDrop(_)
                | Request::SaveShiftEnd(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_are_camel_case_tags() {
        let r: Request = serde_json::from_str(
            r#"{"op":"saveDeparture","rowId":"SHIFT-1","departureTime":"2024-01-01T09:00"}"#,
        )
        .unwrap();
        assert_eq!(r.name(), "saveDeparture");
        assert_eq!(r.target(), "SHIFT-1");
        assert!(r.is_write());

        let r: Request = serde_json::from_str(r#"{"op":"getStage1PendingDrivers"}"#).unwrap();
        assert!(!r.is_write());

        let r: Request =
            serde_json::from_str(r#"{"op":"getVehicleHoursForRange","from":"01/01/2024"}"#)
                .unwrap();
        assert!(matches!(r, Request::GetVehicleHoursForRange { ref to, .. } if to.is_empty()));

        assert!(serde_json::from_str::<Request>(r#"{"op":"dropTable"}"#).is_err());
    }
}
