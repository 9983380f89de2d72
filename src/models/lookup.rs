use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Helper {
    pub id: String,
    pub name: String,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub number: String,
}

/// Reference lists used to populate the shift forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupData {
    pub drivers: Vec<Driver>,
    pub helpers: Vec<Helper>,
    pub vehicles: Vec<Vehicle>,
    pub destinations: Vec<String>,
    pub customers: Vec<String>,
}

/// One row of the reference table ⇔ one CSV line on import.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferenceRow {
    pub driver_id: String,
    pub driver_name: String,
    pub helper_id: String,
    pub helper_name: String,
    pub helper_company: String,
    pub vehicle_number: String,
    pub destination: String,
    pub customer: String,
}
