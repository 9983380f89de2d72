use super::rounding::round2;
use crate::utils::time::hours_between;
use chrono::NaiveDateTime;

/// Default overtime cutoff, in hours.
pub const OVERTIME_THRESHOLD_HOURS: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftHours {
    pub duration: f64,
    pub overtime: f64,
}

/// Gate-to-complete span and the part of it above `threshold`.
/// Overtime is derived from the already rounded duration.
pub fn shift_hours(arrival: &NaiveDateTime, complete: &NaiveDateTime, threshold: f64) -> ShiftHours {
    let duration = round2(hours_between(arrival, complete));
    let overtime = round2((duration - threshold).max(0.0));
    ShiftHours { duration, overtime }
}

/// Hours elapsed since arrival for a shift still running.
pub fn running_hours(arrival: &NaiveDateTime, now: &NaiveDateTime) -> f64 {
    round2(hours_between(arrival, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_civil;

    #[test]
    fn ten_and_a_half_hours_is_one_and_a_half_overtime() {
        let a = parse_civil("01/01/2024 08:00").unwrap();
        let b = parse_civil("01/01/2024 18:30").unwrap();
        let h = shift_hours(&a, &b, OVERTIME_THRESHOLD_HOURS);
        assert_eq!(h.duration, 10.5);
        assert_eq!(h.overtime, 1.5);
    }

    #[test]
    fn short_shift_has_no_overtime() {
        let a = parse_civil("01/01/2024 08:00").unwrap();
        let b = parse_civil("01/01/2024 12:20").unwrap();
        let h = shift_hours(&a, &b, OVERTIME_THRESHOLD_HOURS);
        assert_eq!(h.duration, 4.33);
        assert_eq!(h.overtime, 0.0);
    }

    #[test]
    fn overnight_shift_spans_midnight() {
        let a = parse_civil("01/01/2024 22:00").unwrap();
        let b = parse_civil("02/01/2024 08:15").unwrap();
        let h = shift_hours(&a, &b, OVERTIME_THRESHOLD_HOURS);
        assert_eq!(h.duration, 10.25);
        assert_eq!(h.overtime, 1.25);
    }
}
