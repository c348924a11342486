//! Duty status — what a driver is doing right now.

use serde::{Deserialize, Serialize};

/// Activity category recorded against a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyStatus {
    Driving,
    ShortBreak,
    DailyRest,
    WeeklyRest,
    OtherWork,
    #[default]
    Available,
}

impl DutyStatus {
    /// Whether this status counts as a rest period.
    #[must_use]
    pub fn is_rest(self) -> bool {
        matches!(self, Self::ShortBreak | Self::DailyRest | Self::WeeklyRest)
    }
}

impl std::fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Driving => f.write_str("driving"),
            Self::ShortBreak => f.write_str("short break"),
            Self::DailyRest => f.write_str("daily rest"),
            Self::WeeklyRest => f.write_str("weekly rest"),
            Self::OtherWork => f.write_str("other work"),
            Self::Available => f.write_str("available"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_available() {
        assert_eq!(DutyStatus::default(), DutyStatus::Available);
    }

    #[test]
    fn should_classify_rest_statuses() {
        assert!(DutyStatus::ShortBreak.is_rest());
        assert!(DutyStatus::DailyRest.is_rest());
        assert!(DutyStatus::WeeklyRest.is_rest());
        assert!(!DutyStatus::Driving.is_rest());
        assert!(!DutyStatus::OtherWork.is_rest());
        assert!(!DutyStatus::Available.is_rest());
    }

    #[test]
    fn should_serialize_as_screaming_snake_case() {
        let json = serde_json::to_string(&DutyStatus::ShortBreak).unwrap();
        assert_eq!(json, "\"SHORT_BREAK\"");
        let parsed: DutyStatus = serde_json::from_str("\"WEEKLY_REST\"").unwrap();
        assert_eq!(parsed, DutyStatus::WeeklyRest);
    }
}
