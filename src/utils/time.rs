//! Civil date-time utilities for the single fixed timezone the fleet runs in.
//!
//! Wire format is `DD/MM/YYYY HH:MM[:SS]`; the datetime picker sends
//! `YYYY-MM-DDTHH:MM`, which is accepted anywhere a civil time is.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};

pub const CIVIL_MINUTES: &str = "%d/%m/%Y %H:%M";
pub const CIVIL_SECONDS: &str = "%d/%m/%Y %H:%M:%S";
pub const DB_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

const ACCEPTED: [&str; 5] = [
    CIVIL_SECONDS,
    CIVIL_MINUTES,
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    DB_DATETIME,
];

pub fn parse_civil(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    ACCEPTED
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn format_civil(dt: &NaiveDateTime) -> String {
    dt.format(CIVIL_MINUTES).to_string()
}

pub fn format_civil_seconds(dt: &NaiveDateTime) -> String {
    dt.format(CIVIL_SECONDS).to_string()
}

pub fn db_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DB_DATETIME).to_string()
}

/// Signed span in fractional hours.
pub fn hours_between(start: &NaiveDateTime, end: &NaiveDateTime) -> f64 {
    (*end - *start).num_seconds() as f64 / 3600.0
}

/// `+04:00`, `-05:30`, `+0400` or `Z`.
pub fn parse_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match s.chars().next()? {
        '+' => (1, &s[1..]),
        '-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Wall clock of the configured timezone, optionally pinned to an instant.
#[derive(Debug, Clone, Copy)]
pub struct CivilClock {
    offset: FixedOffset,
    pinned: Option<NaiveDateTime>,
}

impl CivilClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            pinned: None,
        }
    }

    pub fn pinned(offset: FixedOffset, at: NaiveDateTime) -> Self {
        Self {
            offset,
            pinned: Some(at),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.pinned
            .unwrap_or_else(|| Utc::now().with_timezone(&self.offset).naive_local())
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    pub fn yesterday(&self) -> NaiveDate {
        (self.now() - TimeDelta::days(1)).date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DB_DATETIME).unwrap()
    }

    #[test]
    fn picker_input_is_transcoded() {
        let parsed = parse_civil("2024-01-31T07:45").unwrap();
        assert_eq!(format_civil(&parsed), "31/01/2024 07:45");
    }

    #[test]
    fn civil_input_with_and_without_seconds() {
        assert_eq!(parse_civil("01/01/2024 08:00"), Some(dt("2024-01-01 08:00:00")));
        assert_eq!(parse_civil("01/01/2024 08:00:30"), Some(dt("2024-01-01 08:00:30")));
        assert_eq!(parse_civil(""), None);
        assert_eq!(parse_civil("yesterday"), None);
    }

    #[test]
    fn hours_between_is_fractional() {
        let a = dt("2024-01-01 08:00:00");
        let b = dt("2024-01-01 18:30:00");
        assert_eq!(hours_between(&a, &b), 10.5);
        assert_eq!(hours_between(&b, &a), -10.5);
    }

    #[test]
    fn offsets_parse() {
        assert_eq!(parse_offset("+04:00").unwrap().local_minus_utc(), 4 * 3600);
        assert_eq!(parse_offset("-0530").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_offset("Asia/Dubai").is_none());
    }

    #[test]
    fn pinned_clock_reports_yesterday() {
        let clock = CivilClock::pinned(FixedOffset::east_opt(0).unwrap(), dt("2024-03-01 00:30:00"));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(clock.yesterday(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
