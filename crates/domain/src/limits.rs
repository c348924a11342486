//! Regulatory limits — the configurable ceilings driving the duty engine.

use serde::{Deserialize, Serialize};

use crate::error::{HaulPlanError, ValidationError};

/// Minimum daily rest applied when the daily driving ceiling is reached.
pub const DEFAULT_DAILY_REST_MINUTES: u32 = 660;

/// Driving and rest limits, in minutes.
///
/// Every engine call receives the limits explicitly; nothing reads them from
/// ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulatoryLimits {
    pub short_break_minutes: u32,
    /// Minimum rest that clears the continuous-driving counter.
    pub long_break_minutes: u32,
    pub max_continuous_driving_minutes: u32,
    pub max_daily_driving_minutes: u32,
    /// Minimum rest that clears both the continuous and daily counters.
    pub daily_rest_minutes: u32,
}

impl Default for RegulatoryLimits {
    fn default() -> Self {
        Self {
            short_break_minutes: 15,
            long_break_minutes: 45,
            max_continuous_driving_minutes: 270,
            max_daily_driving_minutes: 540,
            daily_rest_minutes: DEFAULT_DAILY_REST_MINUTES,
        }
    }
}

impl RegulatoryLimits {
    /// Check that every limit is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::Validation`] naming the first zero limit.
    pub fn validate(&self) -> Result<(), HaulPlanError> {
        let fields = [
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
            (
                "max_continuous_driving_minutes",
                self.max_continuous_driving_minutes,
            ),
            ("max_daily_driving_minutes", self.max_daily_driving_minutes),
            ("daily_rest_minutes", self.daily_rest_minutes),
        ];
        match fields.into_iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ValidationError::NonPositiveLimit { name }.into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_observed_defaults() {
        let limits = RegulatoryLimits::default();
        assert_eq!(limits.short_break_minutes, 15);
        assert_eq!(limits.long_break_minutes, 45);
        assert_eq!(limits.max_continuous_driving_minutes, 270);
        assert_eq!(limits.max_daily_driving_minutes, 540);
        assert_ne!(limits.daily_rest_minutes, limits.long_break_minutes);
    }

    #[test]
    fn should_accept_default_limits() {
        assert!(RegulatoryLimits::default().validate().is_ok());
    }

    #[test]
    fn should_reject_zero_continuous_limit() {
        let limits = RegulatoryLimits {
            max_continuous_driving_minutes: 0,
            ..RegulatoryLimits::default()
        };
        assert!(matches!(
            limits.validate(),
            Err(HaulPlanError::Validation(ValidationError::NonPositiveLimit {
                name: "max_continuous_driving_minutes"
            }))
        ));
    }

    #[test]
    fn should_fill_missing_fields_with_defaults_when_deserializing() {
        let limits: RegulatoryLimits =
            serde_json::from_str(r#"{"max_daily_driving_minutes": 600}"#).unwrap();
        assert_eq!(limits.max_daily_driving_minutes, 600);
        assert_eq!(limits.long_break_minutes, 45);
    }
}
