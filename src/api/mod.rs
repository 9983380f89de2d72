//! Request surface. Every operation answers with a JSON object:
//! `{"success": true, ...}` or `{"success": false, "error": "..."}`.
//! Nothing raised below this layer reaches the caller.

pub mod request;

pub use request::Request;

use crate::core::dashboard::{DashboardLogic, DashboardSettings};
use crate::core::lookup::LookupLogic;
use crate::core::shift::ShiftLogic;
use crate::db::log::ttlog_quiet;
use crate::db::store::{ShiftStore, SqliteShiftStore};
use crate::errors::{AppError, AppResult};
use crate::models::dashboard::{Dashboard, DashboardDetail};
use crate::models::lookup::LookupData;
use crate::photo::PhotoStore;
use crate::ui::messages::warning;
use crate::utils::date::parse_date;
use crate::utils::time::CivilClock;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Wrap a serializable body as a success response; object bodies are
/// flattened next to `success`, anything else goes under `key`.
fn success<T: Serialize>(key: &str, body: T) -> AppResult<Value> {
    let mut out = Map::new();
    out.insert("success".into(), Value::Bool(true));
    match serde_json::to_value(body)? {
        Value::Object(fields) => out.extend(fields),
        other => {
            out.insert(key.into(), other);
        }
    }
    Ok(Value::Object(out))
}

pub fn failure(message: impl Into<String>) -> Value {
    json!({ "success": false, "error": message.into() })
}

pub fn is_success(response: &Value) -> bool {
    response.get("success").and_then(Value::as_bool).unwrap_or(false)
}

fn required_date(raw: &str, what: &str) -> AppResult<chrono::NaiveDate> {
    parse_date(raw).ok_or_else(|| {
        AppError::Validation(format!("{what} '{raw}' is not a valid date (DD/MM/YYYY)."))
    })
}

pub struct Service<'a> {
    conn: &'a Connection,
    photos: &'a dyn PhotoStore,
    clock: CivilClock,
    settings: DashboardSettings,
}

impl<'a> Service<'a> {
    pub fn new(
        conn: &'a Connection,
        photos: &'a dyn PhotoStore,
        clock: CivilClock,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            conn,
            photos,
            clock,
            settings,
        }
    }

    /// Parse a raw JSON request and answer it.
    pub fn handle_json(&self, raw: &str) -> Value {
        match serde_json::from_str::<Request>(raw) {
            Ok(req) => self.handle(&req),
            Err(e) => failure(format!("Invalid request: {e}")),
        }
    }

    pub fn handle(&self, req: &Request) -> Value {
        let store = SqliteShiftStore::new(self.conn);

        if req.is_write() {
            return match self.write(&store, req) {
                Ok((summary, response)) => {
                    ttlog_quiet(self.conn, req.name(), &req.target(), &summary);
                    response
                }
                Err(e) => {
                    ttlog_quiet(
                        self.conn,
                        &format!("{}_rejected", req.name()),
                        &req.target(),
                        &format!("{}: {}", e.kind(), e),
                    );
                    failure(e.to_string())
                }
            };
        }

        // Read side: a fault degrades to the empty shape.
        self.read(&store, req).unwrap_or_else(|e| {
            warning(format!("{} degraded to empty result: {}", req.name(), e));
            self.empty(req)
        })
    }

    fn shifts<'s>(&'s self, store: &'s dyn ShiftStore) -> ShiftLogic<'s> {
        ShiftLogic::new(store, self.photos, self.clock, self.settings.overtime_threshold)
    }

    fn write(&self, store: &dyn ShiftStore, req: &Request) -> AppResult<(String, Value)> {
        let logic = self.shifts(store);
        match req {
            Request::StartShift(input) => {
                let out = logic.start_shift(input)?;
                let summary = format!("{} arrived at {}", out.row_id, out.arrival_time);
                Ok((summary, success("result", out)?))
            }
            Request::SaveDeparture(input) => {
                let out = logic.record_departure(input)?;
                let summary = format!("departed at {}", out.departure_time);
                Ok((summary, success("result", out)?))
            }
            Request::SaveLastDrop(input) => {
                let out = logic.record_last_drop(input)?;
                let summary = format!(
                    "last drop at {}, submitted {}",
                    out.last_drop_time, out.submitted_at
                );
                Ok((summary, success("result", out)?))
            }
            Request::SaveShiftEnd(input) => {
                let out = logic.complete_shift(input)?;
                let mut summary = format!(
                    "complete: {:.2}h, overtime {:.2}h",
                    out.shift_duration, out.overtime
                );
                if out.departure_auto_filled {
                    summary.push_str(", departure auto-filled");
                }
                Ok((summary, success("result", out)?))
            }
            other => Err(AppError::Validation(format!(
                "{} is not a write operation",
                other.name()
            ))),
        }
    }

    fn read(&self, store: &dyn ShiftStore, req: &Request) -> AppResult<Value> {
        match req {
            Request::GetStage1PendingDrivers => {
                success("drivers", self.shifts(store).list_pending(2)?)
            }
            Request::GetActiveDriversForEndShift => {
                success("drivers", self.shifts(store).list_pending(3)?)
            }
            Request::GetStage3PendingDrivers => {
                success("drivers", self.shifts(store).list_pending(4)?)
            }
            Request::GetDashboardData => {
                let records = store.scan()?;
                success(
                    "dashboard",
                    DashboardLogic::build(&records, self.clock.now(), &self.settings),
                )
            }
            Request::GetDashboardDetailData { date } => {
                let date = required_date(date, "Detail date")?;
                success("detail", DashboardLogic::detail(&store.scan()?, date))
            }
            Request::GetVehicleHoursForRange { from, to } => {
                let from = required_date(from, "Range start")?;
                let to = required_date(to, "Range end")?;
                success(
                    "vehicles",
                    DashboardLogic::vehicle_hours(&store.scan()?, from, to)?,
                )
            }
            Request::GetInitialData => success("lookup", LookupLogic::load(self.conn)?),
            other => Err(AppError::Validation(format!(
                "{} is not a read operation",
                other.name()
            ))),
        }
    }

    fn empty(&self, req: &Request) -> Value {
        let body = match req {
            Request::GetDashboardData => success("dashboard", Dashboard::default()),
            Request::GetDashboardDetailData { .. } => success("detail", DashboardDetail::default()),
            Request::GetInitialData => success("lookup", LookupData::default()),
            Request::GetVehicleHoursForRange { .. } => success("vehicles", Vec::<()>::new()),
            _ => success("drivers", Vec::<()>::new()),
        };
        body.unwrap_or_else(|_| json!({ "success": true }))
    }
}
