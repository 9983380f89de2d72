//! Request payloads of the write operations, as sent by the form layer.
//! Values stay loosely typed here; the lifecycle engine validates them.

use serde::Deserialize;

/// Form fields arrive either as JSON numbers or as the raw text typed in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) if s.trim().is_empty() => Some(0.0),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for NumberOrText {
    fn from(n: f64) -> Self {
        NumberOrText::Number(n)
    }
}

impl From<u32> for NumberOrText {
    fn from(n: u32) -> Self {
        NumberOrText::Number(n as f64)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartShiftInput {
    pub driver_id: String,
    pub driver_name: String,
    pub helper_id: Option<String>,
    pub helper_name: Option<String>,
    pub helper_company: Option<String>,
    pub vehicle_number: String,
    pub start_odometer: Option<NumberOrText>,
    pub start_photo_base64: Option<String>,
    pub fuel_taken: Option<String>,
    pub destination_emirate: Option<String>,
    pub primary_customer: Option<String>,
    pub total_drops: Option<NumberOrText>,
    pub shift_start_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepartureInput {
    pub row_id: String,
    pub departure_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LastDropInput {
    pub row_id: String,
    pub last_drop_time: Option<String>,
    pub failed_drops: Option<NumberOrText>,
    pub last_drop_photo_base64: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShiftEndInput {
    pub row_id: String,
    pub shift_complete_time: Option<String>,
    pub end_odometer: Option<NumberOrText>,
    pub end_photo_base64: Option<String>,
}
