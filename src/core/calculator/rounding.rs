//! Half-away-from-zero rounding (`f64::round` semantics).

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// `part / whole × 100` at one decimal; 0 when `whole` is 0.
pub fn failure_rate(failed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(failed as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_round_away_from_zero() {
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(-2.125_000_1), -2.13);
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round2(10.5), 10.5);
    }

    #[test]
    fn failure_rate_guards_zero_total() {
        assert_eq!(failure_rate(5, 40), 12.5);
        assert_eq!(failure_rate(0, 0), 0.0);
        assert_eq!(failure_rate(3, 0), 0.0);
        assert_eq!(failure_rate(1, 3), 33.3);
    }
}
