use crate::api::{Request, Service, is_success};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::input::{DepartureInput, LastDropInput, ShiftEndInput, StartShiftInput};
use crate::photo::DirPhotoStore;
use crate::utils::time::{CivilClock, parse_civil};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

fn clock(cli: &Cli, cfg: &Config) -> AppResult<CivilClock> {
    match &cli.now {
        Some(raw) => {
            let at = parse_civil(raw)
                .ok_or_else(|| AppError::InvalidDateTime(format!("--now {raw}")))?;
            Ok(CivilClock::pinned(cfg.offset()?, at))
        }
        None => cfg.clock(),
    }
}

/// Read an image file into the data-URI payload the forms send.
fn photo_payload(file: &str) -> AppResult<String> {
    let path = Path::new(file);
    let bytes = fs::read(path).map_err(|e| {
        AppError::Validation(format!("Cannot read photo '{}': {}", path.display(), e))
    })?;

    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    };
    Ok(format!("data:{mime};base64,{}", B64.encode(bytes)))
}

fn request_for(cmd: &Commands) -> AppResult<Request> {
    let req = match cmd {
        Commands::Start {
            driver_id,
            driver_name,
            helper_id,
            helper_name,
            helper_company,
            vehicle,
            odometer,
            photo,
            fuel,
            destination,
            customer,
            drops,
            at,
        } => Request::StartShift(StartShiftInput {
            driver_id: driver_id.clone(),
            driver_name: driver_name.clone(),
            helper_id: helper_id.clone(),
            helper_name: helper_name.clone(),
            helper_company: helper_company.clone(),
            vehicle_number: vehicle.clone(),
            start_odometer: Some((*odometer).into()),
            start_photo_base64: Some(photo_payload(photo)?),
            fuel_taken: fuel.clone(),
            destination_emirate: destination.clone(),
            primary_customer: customer.clone(),
            total_drops: Some((*drops).into()),
            shift_start_time: Some(at.clone()),
        }),
        Commands::Depart { row_id, at } => Request::SaveDeparture(DepartureInput {
            row_id: row_id.clone(),
            departure_time: Some(at.clone()),
        }),
        Commands::LastDrop {
            row_id,
            at,
            failed,
            photo,
        } => Request::SaveLastDrop(LastDropInput {
            row_id: row_id.clone(),
            last_drop_time: Some(at.clone()),
            failed_drops: Some((*failed).into()),
            last_drop_photo_base64: Some(photo_payload(photo)?),
        }),
        Commands::End {
            row_id,
            at,
            odometer,
            photo,
        } => Request::SaveShiftEnd(ShiftEndInput {
            row_id: row_id.clone(),
            shift_complete_time: Some(at.clone()),
            end_odometer: Some((*odometer).into()),
            end_photo_base64: Some(photo_payload(photo)?),
        }),
        Commands::Pending { stage: 2 } => Request::GetStage1PendingDrivers,
        Commands::Pending { stage: 3 } => Request::GetActiveDriversForEndShift,
        Commands::Pending { stage: 4 } => Request::GetStage3PendingDrivers,
        Commands::Pending { stage } => {
            return Err(AppError::InvalidStage(stage.to_string()));
        }
        Commands::Dashboard => Request::GetDashboardData,
        Commands::Detail { date } => Request::GetDashboardDetailData { date: date.clone() },
        Commands::VehicleHours { from, to } => Request::GetVehicleHoursForRange {
            from: from.clone(),
            to: to.clone(),
        },
        _ => return Err(AppError::Validation("not a shift operation".into())),
    };
    Ok(req)
}

/// Print the response; a `{success:false}` answer becomes the exit status.
fn emit(response: Value) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(&response)?);
    if is_success(&response) {
        Ok(())
    } else {
        let msg = response
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        Err(AppError::Rejected(msg))
    }
}

/// Handle the per-operation commands and `rpc`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;
    let photos = DirPhotoStore::new(&cfg.photo_dir, &cfg.photo_base_url);
    let service = Service::new(&pool.conn, &photos, clock(cli, cfg)?, cfg.dashboard_settings());

    let response = match &cli.command {
        Commands::Rpc { request } => {
            let raw = match request {
                Some(r) => r.clone(),
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            service.handle_json(&raw)
        }
        other => service.handle(&request_for(other)?),
    };

    emit(response)
}
