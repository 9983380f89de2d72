use serde::Serialize;

/// Lifecycle state of a shift, stored next to the record and advanced
/// at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ShiftStage {
    Arrived,           // 1
    Departed,          // 2
    LastDropSubmitted, // 3
    Complete,          // 4
}

impl ShiftStage {
    pub fn number(&self) -> u8 {
        match self {
            ShiftStage::Arrived => 1,
            ShiftStage::Departed => 2,
            ShiftStage::LastDropSubmitted => 3,
            ShiftStage::Complete => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShiftStage::Arrived => "Arrived",
            ShiftStage::Departed => "Departed",
            ShiftStage::LastDropSubmitted => "Last drop submitted",
            ShiftStage::Complete => "Complete",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ShiftStage::Arrived => "arrived",
            ShiftStage::Departed => "departed",
            ShiftStage::LastDropSubmitted => "last_drop",
            ShiftStage::Complete => "complete",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "arrived" => Some(ShiftStage::Arrived),
            "departed" => Some(ShiftStage::Departed),
            "last_drop" => Some(ShiftStage::LastDropSubmitted),
            "complete" => Some(ShiftStage::Complete),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ShiftStage::Complete)
    }

    /// Number of the stage the driver still has to submit (2, 3 or 4).
    pub fn pending_stage(&self) -> Option<u8> {
        match self {
            ShiftStage::Complete => None,
            other => Some(other.number() + 1),
        }
    }

    /// A departure never moves a shift backwards.
    pub fn after_departure(self) -> Self {
        match self {
            ShiftStage::Arrived => ShiftStage::Departed,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_strings_round_trip_every_stage() {
        for stage in [
            ShiftStage::Arrived,
            ShiftStage::Departed,
            ShiftStage::LastDropSubmitted,
            ShiftStage::Complete,
        ] {
            assert_eq!(ShiftStage::from_db_str(stage.to_db_str()), Some(stage));
        }
        assert_eq!(ShiftStage::from_db_str("done"), None);
    }

    #[test]
    fn pending_stage_points_at_next_submission() {
        assert_eq!(ShiftStage::Arrived.pending_stage(), Some(2));
        assert_eq!(ShiftStage::Departed.pending_stage(), Some(3));
        assert_eq!(ShiftStage::LastDropSubmitted.pending_stage(), Some(4));
        assert_eq!(ShiftStage::Complete.pending_stage(), None);
    }

    #[test]
    fn late_departure_keeps_stage() {
        assert_eq!(ShiftStage::Arrived.after_departure(), ShiftStage::Departed);
        assert_eq!(
            ShiftStage::LastDropSubmitted.after_departure(),
            ShiftStage::LastDropSubmitted
        );
    }
}
