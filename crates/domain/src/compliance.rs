//! Compliance evaluator — a single-shot check of whether a driver's current
//! duty state can carry a trip without a stop.
//!
//! This is the fast yes/no gate. It does not plan rests; see
//! [`crate::planner`] for that.

use serde::{Deserialize, Serialize};

use crate::duty::DutyState;
use crate::error::HaulPlanError;
use crate::limits::RegulatoryLimits;
use crate::time::Timestamp;

/// Verdict plus an ordered list of human-readable breaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub compliant: bool,
    pub warnings: Vec<String>,
}

impl Default for ComplianceResult {
    fn default() -> Self {
        Self::compliant()
    }
}

impl ComplianceResult {
    /// A passing result with no warnings.
    #[must_use]
    pub fn compliant() -> Self {
        Self {
            compliant: true,
            warnings: Vec::new(),
        }
    }

    /// Build a result from warnings; compliant only when there are none.
    #[must_use]
    pub fn from_warnings(warnings: Vec<String>) -> Self {
        Self {
            compliant: warnings.is_empty(),
            warnings,
        }
    }

    /// Record a breach, flipping the verdict to non-compliant.
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.compliant = false;
        self.warnings.push(warning.into());
    }
}

/// Check whether `state` can drive `trip_duration_minutes` more without
/// exceeding a limit.
///
/// `at` is the evaluation instant, used to measure a rest that is still in
/// progress. The state is never modified.
#[must_use]
pub fn check_compliance(
    state: &DutyState,
    trip_duration_minutes: u32,
    limits: &RegulatoryLimits,
    at: Timestamp,
) -> ComplianceResult {
    if let Err(err) = limits.validate() {
        return ComplianceResult::from_warnings(vec![format!(
            "Cannot evaluate compliance: {}",
            invalid_limits_reason(&err)
        )]);
    }

    let counters = state.counters();
    let budget = counters.budget(limits);
    let mut warnings = Vec::new();

    if trip_duration_minutes > budget.continuous_minutes {
        warnings.push(format!(
            "Trip needs {trip_duration_minutes} min of driving but only {} min remain before a \
             {} min break is required; continuous driving limit exceeded by {} min",
            budget.continuous_minutes,
            limits.long_break_minutes,
            trip_duration_minutes - budget.continuous_minutes,
        ));
    }

    if trip_duration_minutes > budget.daily_minutes {
        warnings.push(format!(
            "Trip exceeds the daily driving limit of {} min by {} min ({} min remaining today)",
            limits.max_daily_driving_minutes,
            trip_duration_minutes - budget.daily_minutes,
            budget.daily_minutes,
        ));
    }

    if state.status().is_rest()
        && counters.continuous_driving_minutes >= limits.max_continuous_driving_minutes
    {
        let rested = state.minutes_in_status(at);
        if rested < limits.long_break_minutes {
            warnings.push(format!(
                "Insufficient rest taken: {rested} of {} min completed before driving may resume",
                limits.long_break_minutes,
            ));
        }
    }

    ComplianceResult::from_warnings(warnings)
}

/// Text for a rejected [`RegulatoryLimits`], naming the offending field.
pub(crate) fn invalid_limits_reason(err: &HaulPlanError) -> String {
    match err {
        HaulPlanError::Validation(inner) => inner.to_string(),
        other => other.to_string(),
    }
}
