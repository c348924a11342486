//! Duty state — a driver's current status and rolling driving counters.
//!
//! The state is only ever changed through [`DutyState::transition`]. Planning
//! code never sees the live state; it works on a [`DutyCounters`] snapshot.
//!
//! Reset rules applied on a transition:
//! - leaving a rest that lasted at least `long_break_minutes` clears the
//!   continuous counter;
//! - entering [`DutyStatus::DailyRest`] clears the continuous and daily
//!   counters;
//! - entering [`DutyStatus::WeeklyRest`] clears all three.

mod status;

pub use status::DutyStatus;

use serde::{Deserialize, Serialize};

use crate::limits::RegulatoryLimits;
use crate::time::{Timestamp, whole_minutes_between};

/// The three rolling driving counters, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DutyCounters {
    pub continuous_driving_minutes: u32,
    pub daily_driving_minutes_today: u32,
    pub weekly_driving_minutes: u32,
}

impl DutyCounters {
    /// Driving minutes still available before each ceiling, floored at zero.
    #[must_use]
    pub fn budget(&self, limits: &RegulatoryLimits) -> DrivingBudget {
        DrivingBudget {
            continuous_minutes: limits
                .max_continuous_driving_minutes
                .saturating_sub(self.continuous_driving_minutes),
            daily_minutes: limits
                .max_daily_driving_minutes
                .saturating_sub(self.daily_driving_minutes_today),
        }
    }

    fn add_driving(&mut self, minutes: u32) {
        self.continuous_driving_minutes = self.continuous_driving_minutes.saturating_add(minutes);
        self.daily_driving_minutes_today =
            self.daily_driving_minutes_today.saturating_add(minutes);
        self.weekly_driving_minutes = self.weekly_driving_minutes.saturating_add(minutes);
    }
}

/// Remaining driving minutes before the continuous and daily ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrivingBudget {
    pub continuous_minutes: u32,
    pub daily_minutes: u32,
}

impl DrivingBudget {
    /// The smaller of the two budgets.
    #[must_use]
    pub fn binding_minutes(&self) -> u32 {
        self.continuous_minutes.min(self.daily_minutes)
    }
}

/// A driver's live duty state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyState {
    status: DutyStatus,
    status_start_time: Timestamp,
    #[serde(flatten)]
    counters: DutyCounters,
}

/// What a call to [`DutyState::transition`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DutyStatus,
    pub to: DutyStatus,
    /// `false` when the new status equals the current one.
    pub applied: bool,
    /// Whole minutes spent in `from`, clamped to zero on clock skew.
    pub elapsed_minutes: u32,
    /// The timestamp was earlier than the start of the current status.
    pub clock_skew: bool,
    pub continuous_reset: bool,
}

impl DutyState {
    /// A fresh state: [`DutyStatus::Available`] with zero counters.
    #[must_use]
    pub fn new(at: Timestamp) -> Self {
        Self::from_parts(DutyStatus::Available, at, DutyCounters::default())
    }

    /// Rebuild a state from a stored driver record.
    #[must_use]
    pub fn from_parts(
        status: DutyStatus,
        status_start_time: Timestamp,
        counters: DutyCounters,
    ) -> Self {
        Self {
            status,
            status_start_time,
            counters,
        }
    }

    #[must_use]
    pub fn status(&self) -> DutyStatus {
        self.status
    }

    #[must_use]
    pub fn status_start_time(&self) -> Timestamp {
        self.status_start_time
    }

    #[must_use]
    pub fn counters(&self) -> &DutyCounters {
        &self.counters
    }

    /// Copy of the counters for planning.
    #[must_use]
    pub fn snapshot(&self) -> DutyCounters {
        self.counters
    }

    /// Whole minutes spent in the current status as of `at`, zero on skew.
    #[must_use]
    pub fn minutes_in_status(&self, at: Timestamp) -> u32 {
        whole_minutes_between(self.status_start_time, at).unwrap_or(0)
    }

    /// Move to `new_status` at `at`, updating and resetting counters.
    ///
    /// The continuous counter is cleared when a rest of at least
    /// `long_break_minutes` ends, whatever status follows. Entering another
    /// rest status after a qualifying rest is one case of this; returning to
    /// driving after a full break is the other.
    ///
    /// A timestamp earlier than the current status start is treated as zero
    /// elapsed time and reported through [`Transition::clock_skew`].
    pub fn transition(
        &mut self,
        new_status: DutyStatus,
        at: Timestamp,
        limits: &RegulatoryLimits,
    ) -> Transition {
        let from = self.status;
        if new_status == from {
            return Transition {
                from,
                to: new_status,
                applied: false,
                elapsed_minutes: 0,
                clock_skew: false,
                continuous_reset: false,
            };
        }

        let elapsed = whole_minutes_between(self.status_start_time, at);
        let elapsed_minutes = elapsed.unwrap_or(0);

        if from == DutyStatus::Driving {
            self.counters.add_driving(elapsed_minutes);
        }

        let mut continuous_reset = false;
        if from.is_rest() && elapsed_minutes >= limits.long_break_minutes {
            self.counters.continuous_driving_minutes = 0;
            continuous_reset = true;
        }

        match new_status {
            DutyStatus::DailyRest => {
                self.counters.continuous_driving_minutes = 0;
                self.counters.daily_driving_minutes_today = 0;
                continuous_reset = true;
            }
            DutyStatus::WeeklyRest => {
                self.counters = DutyCounters::default();
                continuous_reset = true;
            }
            _ => {}
        }

        self.status = new_status;
        self.status_start_time = at;

        Transition {
            from,
            to: new_status,
            applied: true,
            elapsed_minutes,
            clock_skew: elapsed.is_none(),
            continuous_reset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::add_minutes;
    use chrono::{TimeZone, Utc};

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap()
    }

    fn limits() -> RegulatoryLimits {
        RegulatoryLimits::default()
    }

    fn driving_since_start(counters: DutyCounters) -> DutyState {
        DutyState::from_parts(DutyStatus::Driving, start(), counters)
    }

    #[test]
    fn should_start_available_with_zero_counters() {
        let state = DutyState::new(start());
        assert_eq!(state.status(), DutyStatus::Available);
        assert_eq!(*state.counters(), DutyCounters::default());
    }

    #[test]
    fn should_ignore_transition_to_same_status() {
        let mut state = driving_since_start(DutyCounters::default());
        let before = state.clone();
        let outcome = state.transition(DutyStatus::Driving, add_minutes(start(), 90), &limits());
        assert!(!outcome.applied);
        assert_eq!(state, before);
    }

    #[test]
    fn should_add_driving_time_to_all_counters() {
        let mut state = driving_since_start(DutyCounters {
            continuous_driving_minutes: 10,
            daily_driving_minutes_today: 100,
            weekly_driving_minutes: 1000,
        });
        let outcome = state.transition(DutyStatus::OtherWork, add_minutes(start(), 95), &limits());
        assert_eq!(outcome.elapsed_minutes, 95);
        assert_eq!(state.counters().continuous_driving_minutes, 105);
        assert_eq!(state.counters().daily_driving_minutes_today, 195);
        assert_eq!(state.counters().weekly_driving_minutes, 1095);
    }

    #[test]
    fn should_conserve_counter_delta_when_driving_ends_in_short_break() {
        let mut state = driving_since_start(DutyCounters::default());
        let before = state.counters().continuous_driving_minutes;
        let end = start() + chrono::TimeDelta::seconds(60 * 130 + 59);
        state.transition(DutyStatus::ShortBreak, end, &limits());
        assert_eq!(state.counters().continuous_driving_minutes - before, 130);
    }

    #[test]
    fn should_not_accumulate_when_previous_status_was_not_driving() {
        let mut state =
            DutyState::from_parts(DutyStatus::OtherWork, start(), DutyCounters::default());
        state.transition(DutyStatus::Driving, add_minutes(start(), 120), &limits());
        assert_eq!(*state.counters(), DutyCounters::default());
        assert_eq!(state.status(), DutyStatus::Driving);
        assert_eq!(state.status_start_time(), add_minutes(start(), 120));
    }

    #[test]
    fn should_clear_daily_and_continuous_counters_on_daily_rest() {
        let mut state = driving_since_start(DutyCounters {
            continuous_driving_minutes: 200,
            daily_driving_minutes_today: 480,
            weekly_driving_minutes: 2000,
        });
        let outcome = state.transition(DutyStatus::DailyRest, add_minutes(start(), 30), &limits());
        assert!(outcome.continuous_reset);
        assert_eq!(state.counters().continuous_driving_minutes, 0);
        assert_eq!(state.counters().daily_driving_minutes_today, 0);
        assert_eq!(state.counters().weekly_driving_minutes, 2030);
    }

    #[test]
    fn should_clear_every_counter_on_weekly_rest() {
        let mut state = driving_since_start(DutyCounters {
            continuous_driving_minutes: 60,
            daily_driving_minutes_today: 300,
            weekly_driving_minutes: 3000,
        });
        state.transition(DutyStatus::WeeklyRest, add_minutes(start(), 15), &limits());
        assert_eq!(*state.counters(), DutyCounters::default());
    }

    #[test]
    fn should_keep_continuous_counter_after_short_break_below_long_break() {
        let mut state = DutyState::from_parts(
            DutyStatus::ShortBreak,
            start(),
            DutyCounters {
                continuous_driving_minutes: 200,
                ..DutyCounters::default()
            },
        );
        let outcome = state.transition(DutyStatus::Driving, add_minutes(start(), 20), &limits());
        assert!(!outcome.continuous_reset);
        assert_eq!(state.counters().continuous_driving_minutes, 200);
    }

    #[test]
    fn should_clear_continuous_counter_after_break_of_long_break_length() {
        let mut state = DutyState::from_parts(
            DutyStatus::ShortBreak,
            start(),
            DutyCounters {
                continuous_driving_minutes: 270,
                daily_driving_minutes_today: 270,
                weekly_driving_minutes: 270,
            },
        );
        let outcome = state.transition(DutyStatus::Driving, add_minutes(start(), 45), &limits());
        assert!(outcome.continuous_reset);
        assert_eq!(state.counters().continuous_driving_minutes, 0);
        assert_eq!(state.counters().daily_driving_minutes_today, 270);
    }

    #[test]
    fn should_clear_continuous_counter_when_qualifying_rest_moves_into_short_break() {
        let mut state = DutyState::from_parts(
            DutyStatus::DailyRest,
            start(),
            DutyCounters {
                continuous_driving_minutes: 15,
                ..DutyCounters::default()
            },
        );
        state.transition(DutyStatus::ShortBreak, add_minutes(start(), 60), &limits());
        assert_eq!(state.counters().continuous_driving_minutes, 0);
    }

    #[test]
    fn should_clamp_backwards_timestamp_to_zero_elapsed() {
        let mut state = driving_since_start(DutyCounters {
            continuous_driving_minutes: 40,
            daily_driving_minutes_today: 40,
            weekly_driving_minutes: 40,
        });
        let earlier = start() - chrono::TimeDelta::minutes(30);
        let outcome = state.transition(DutyStatus::Available, earlier, &limits());
        assert!(outcome.applied);
        assert!(outcome.clock_skew);
        assert_eq!(outcome.elapsed_minutes, 0);
        assert_eq!(state.counters().continuous_driving_minutes, 40);
        assert_eq!(state.status(), DutyStatus::Available);
        assert_eq!(state.status_start_time(), earlier);
    }

    #[test]
    fn should_flag_clock_skew_for_sub_minute_backward_step() {
        let mut state = driving_since_start(DutyCounters::default());
        let earlier = start() - chrono::TimeDelta::seconds(30);
        let outcome = state.transition(DutyStatus::Available, earlier, &limits());
        assert!(outcome.clock_skew);
        assert_eq!(outcome.elapsed_minutes, 0);
    }

    #[test]
    fn should_floor_budget_at_zero_when_counters_exceed_limits() {
        let counters = DutyCounters {
            continuous_driving_minutes: 300,
            daily_driving_minutes_today: 100,
            weekly_driving_minutes: 0,
        };
        let budget = counters.budget(&limits());
        assert_eq!(budget.continuous_minutes, 0);
        assert_eq!(budget.daily_minutes, 440);
        assert_eq!(budget.binding_minutes(), 0);
    }

    #[test]
    fn should_serialize_counters_flat_alongside_status() {
        let state = driving_since_start(DutyCounters {
            continuous_driving_minutes: 5,
            daily_driving_minutes_today: 6,
            weekly_driving_minutes: 7,
        });
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "DRIVING");
        assert_eq!(json["continuous_driving_minutes"], 5);
        assert_eq!(json["weekly_driving_minutes"], 7);
        let parsed: DutyState = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, state);
    }
}
