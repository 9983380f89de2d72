//! Civil date helpers: `DD/MM/YYYY` on the wire, `YYYY-MM-DD` in the database.

use chrono::NaiveDate;

pub const CIVIL_DATE: &str = "%d/%m/%Y";
pub const DB_DATE: &str = "%Y-%m-%d";

/// Accepts `DD/MM/YYYY` (wire) or `YYYY-MM-DD` (picker / database).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, CIVIL_DATE)
        .or_else(|_| NaiveDate::parse_from_str(s, DB_DATE))
        .ok()
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format(CIVIL_DATE).to_string()
}

pub fn db_date(d: &NaiveDate) -> String {
    d.format(DB_DATE).to_string()
}

pub fn month_last_day(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_date_shapes() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date("09/03/2024"), Some(d));
        assert_eq!(parse_date(" 2024-03-09 "), Some(d));
        assert_eq!(parse_date("2024/03/09"), None);
        assert_eq!(format_date(&d), "09/03/2024");
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(month_last_day(2024, 2), Some(29));
        assert_eq!(month_last_day(2023, 2), Some(28));
        assert_eq!(month_last_day(2023, 12), Some(31));
        assert_eq!(month_last_day(2023, 13), None);
    }
}
