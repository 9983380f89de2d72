use crate::db::store::ShiftStore;
use crate::errors::AppResult;
use crate::models::stage::ShiftStage;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::date::format_date;
use std::fs;

pub fn print_db_info(store: &dyn ShiftStore, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) SHIFTS BY STAGE
    //
    let records = store.scan()?;
    println!(
        "{}• Total shifts:{} {}{}{}",
        CYAN,
        RESET,
        GREEN,
        records.len(),
        RESET
    );

    for stage in [
        ShiftStage::Arrived,
        ShiftStage::Departed,
        ShiftStage::LastDropSubmitted,
        ShiftStage::Complete,
    ] {
        let n = records.iter().filter(|r| r.stage == stage).count();
        println!("    {:<20} {}", stage.label(), n);
    }

    //
    // 3) DATE RANGE
    //
    let first = records.iter().map(|r| r.shift_date).min();
    let last = records.iter().map(|r| r.shift_date).max();

    let fmt = |d: Option<chrono::NaiveDate>| {
        d.map(|d| format_date(&d))
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt(first));
    println!("    to:   {}", fmt(last));

    //
    // 4) AVERAGE SHIFTS/DAY
    //
    if let (Some(f), Some(l)) = (first, last) {
        let days = (l - f).num_days().max(1);
        let avg = records.len() as f64 / days as f64;
        println!("{}• Average shifts/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
