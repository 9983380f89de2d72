use crate::errors::{AppError, AppResult};
use crate::utils::date::month_last_day;
use chrono::NaiveDate;

fn bad(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// First and last day covered by a single `YYYY`, `YYYY-MM` or
/// `YYYY-MM-DD` term.
fn bounds(term: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let term = term.trim();
    match term.len() {
        4 => {
            let y: i32 = term.parse().map_err(|_| bad(format!("invalid year '{term}'")))?;
            let first = NaiveDate::from_ymd_opt(y, 1, 1);
            let last = NaiveDate::from_ymd_opt(y, 12, 31);
            first
                .zip(last)
                .ok_or_else(|| bad(format!("invalid year '{term}'")))
        }
        7 => {
            let invalid = || bad(format!("invalid month '{term}'"));
            let (y, m) = term.split_once('-').ok_or_else(invalid)?;
            let y: i32 = y.parse().map_err(|_| invalid())?;
            let m: u32 = m.parse().map_err(|_| invalid())?;
            let last_day = month_last_day(y, m).ok_or_else(invalid)?;
            NaiveDate::from_ymd_opt(y, m, 1)
                .zip(NaiveDate::from_ymd_opt(y, m, last_day))
                .ok_or_else(invalid)
        }
        10 => {
            let d = NaiveDate::parse_from_str(term, "%Y-%m-%d")
                .map_err(|_| bad(format!("invalid date '{term}'")))?;
            Ok((d, d))
        }
        _ => Err(bad(format!(
            "unsupported range '{term}' (use YYYY, YYYY-MM or YYYY-MM-DD)"
        ))),
    }
}

/// Parse `--range`: a single term, or `start:end` with both ends in the
/// same shape.
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let Some((start, end)) = r.split_once(':') else {
        return bounds(r);
    };

    if start.trim().len() != end.trim().len() {
        return Err(bad("start and end of a range must have the same format"));
    }

    let (from, _) = bounds(start)?;
    let (_, to) = bounds(end)?;
    if from > to {
        return Err(bad(format!("range start {from} is after its end {to}")));
    }
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn single_terms() {
        assert_eq!(parse_range("2024").unwrap(), (d(2024, 1, 1), d(2024, 12, 31)));
        assert_eq!(parse_range("2024-02").unwrap(), (d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(parse_range("2024-02-10").unwrap(), (d(2024, 2, 10), d(2024, 2, 10)));
    }

    #[test]
    fn intervals() {
        assert_eq!(
            parse_range("2024-11:2025-01").unwrap(),
            (d(2024, 11, 1), d(2025, 1, 31))
        );
        assert!(parse_range("2024:2024-05").is_err());
        assert!(parse_range("2025:2024").is_err());
        assert!(parse_range("2024-13").is_err());
        assert!(parse_range("last week").is_err());
    }
}
