//! Trip timeline simulator — splits a trip into drive and rest segments so
//! that no regulatory limit is exceeded, and turns every inserted rest into a
//! located, timestamped [`RestStopRecommendation`].
//!
//! The simulation runs on a copy of the driver's counters ([`DutyCounters`]);
//! the live [`DutyState`](crate::duty::DutyState) is never touched.
//!
//! Segmentation is greedy. Each drive segment runs until the first of
//! the continuous budget, the daily budget, or the end of the trip. The
//! continuous ceiling bounds every segment. When a segment stops with the
//! daily budget spent, the rest is a daily rest (clearing both counters);
//! otherwise it is a long break (clearing the continuous counter).

use serde::{Deserialize, Serialize};

use crate::compliance::{ComplianceResult, invalid_limits_reason};
use crate::duty::{DrivingBudget, DutyCounters};
use crate::limits::RegulatoryLimits;
use crate::route::locate;
use crate::time::{Timestamp, add_minutes};
use crate::trip::TripPlan;

/// Extra loop iterations allowed on top of the computed bound.
const ITERATION_SLACK: u64 = 16;

/// Most drive/rest steps a progressing simulation of `duration` can take.
///
/// Every rest restores at least the smaller of the two ceilings within two
/// steps, so only a stalled loop can exceed this.
fn iteration_bound(duration_minutes: u32, limits: &RegulatoryLimits) -> u64 {
    let smallest = limits
        .max_continuous_driving_minutes
        .min(limits.max_daily_driving_minutes)
        .max(1);
    2 * (u64::from(duration_minutes / smallest) + 2) + ITERATION_SLACK
}

/// Kind of rest a stop asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestType {
    ShortBreak,
    LongBreak,
    DailyRest,
}

impl RestType {
    /// Minimum length of this rest under `limits`.
    #[must_use]
    pub fn duration_minutes(self, limits: &RegulatoryLimits) -> u32 {
        match self {
            Self::ShortBreak => limits.short_break_minutes,
            Self::LongBreak => limits.long_break_minutes,
            Self::DailyRest => limits.daily_rest_minutes,
        }
    }
}

impl std::fmt::Display for RestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShortBreak => f.write_str("short break"),
            Self::LongBreak => f.write_str("long break"),
            Self::DailyRest => f.write_str("daily rest"),
        }
    }
}

/// A planned pause along the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestStopRecommendation {
    /// Driving minutes completed when the stop begins.
    pub elapsed_minutes_from_departure: u32,
    pub distance_from_start_km: f64,
    /// Wall-clock time the driver reaches the stop, earlier rests included.
    pub estimated_arrival_time: Timestamp,
    pub recommended_duration_minutes: u32,
    pub rest_type: RestType,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_risk: Option<f64>,
}

/// What happens during a [`TimelineSegment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "rest_type", rename_all = "snake_case")]
pub enum SegmentKind {
    Drive,
    Rest(RestType),
}

/// One contiguous stretch of the simulated timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSegment {
    pub kind: SegmentKind,
    pub start_time: Timestamp,
    pub duration_minutes: u32,
}

/// Result of [`plan_rest_stops`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestPlan {
    pub compliance: ComplianceResult,
    pub stops: Vec<RestStopRecommendation>,
    pub segments: Vec<TimelineSegment>,
    pub departure_time: Timestamp,
    pub arrival_time: Timestamp,
    pub budget_before: DrivingBudget,
    /// Budget left on arrival, after the planned rests.
    pub budget_after: DrivingBudget,
    /// Projected counters on arrival.
    pub counters_after: DutyCounters,
}

impl RestPlan {
    /// Whether at least one rest had to be inserted.
    #[must_use]
    pub fn stops_required(&self) -> bool {
        !self.stops.is_empty()
    }

    /// Total minutes spent resting across all stops.
    #[must_use]
    pub fn total_rest_minutes(&self) -> u32 {
        self.stops
            .iter()
            .map(|stop| stop.recommended_duration_minutes)
            .sum()
    }
}

/// Virtual clock and counters advanced by the simulation.
struct Timeline<'a> {
    trip: &'a TripPlan,
    limits: &'a RegulatoryLimits,
    counters: DutyCounters,
    driven_minutes: u32,
    clock: Timestamp,
    segments: Vec<TimelineSegment>,
    stops: Vec<RestStopRecommendation>,
}

impl<'a> Timeline<'a> {
    fn new(trip: &'a TripPlan, limits: &'a RegulatoryLimits, counters: DutyCounters) -> Self {
        Self {
            trip,
            limits,
            counters,
            driven_minutes: 0,
            clock: trip.departure_time,
            segments: Vec::new(),
            stops: Vec::new(),
        }
    }

    fn budget(&self) -> DrivingBudget {
        self.counters.budget(self.limits)
    }

    fn drive(&mut self, minutes: u32) {
        if minutes == 0 {
            return;
        }
        self.segments.push(TimelineSegment {
            kind: SegmentKind::Drive,
            start_time: self.clock,
            duration_minutes: minutes,
        });
        self.counters.continuous_driving_minutes =
            self.counters.continuous_driving_minutes.saturating_add(minutes);
        self.counters.daily_driving_minutes_today =
            self.counters.daily_driving_minutes_today.saturating_add(minutes);
        self.counters.weekly_driving_minutes =
            self.counters.weekly_driving_minutes.saturating_add(minutes);
        self.driven_minutes += minutes;
        self.clock = add_minutes(self.clock, minutes);
    }

    fn rest(&mut self, rest_type: RestType) {
        let duration = rest_type.duration_minutes(self.limits);
        let distance = self.distance_at(self.driven_minutes);
        let location = locate(self.trip, distance);
        let stop = RestStopRecommendation {
            elapsed_minutes_from_departure: self.driven_minutes,
            distance_from_start_km: distance,
            estimated_arrival_time: self.clock,
            recommended_duration_minutes: duration,
            rest_type,
            reason: self.reason(rest_type),
            latitude: location.map(|p| p.latitude),
            longitude: location.map(|p| p.longitude),
            weather_risk: location.and_then(|p| p.weather_risk),
        };

        self.stops.push(stop);
        self.segments.push(TimelineSegment {
            kind: SegmentKind::Rest(rest_type),
            start_time: self.clock,
            duration_minutes: duration,
        });

        match rest_type {
            RestType::DailyRest => {
                self.counters.continuous_driving_minutes = 0;
                self.counters.daily_driving_minutes_today = 0;
            }
            RestType::LongBreak => self.counters.continuous_driving_minutes = 0,
            RestType::ShortBreak => {}
        }
        self.clock = add_minutes(self.clock, duration);
    }

    // Constant average speed; the geometry is only used for placement.
    fn distance_at(&self, driven_minutes: u32) -> f64 {
        let total = self.trip.total_duration_minutes;
        if total == 0 {
            return 0.0;
        }
        self.trip.total_distance_km * f64::from(driven_minutes.min(total)) / f64::from(total)
    }

    fn reason(&self, rest_type: RestType) -> String {
        match rest_type {
            RestType::DailyRest => format!(
                "Daily driving limit of {} min reached; a {} min daily rest is required",
                self.limits.max_daily_driving_minutes, self.limits.daily_rest_minutes,
            ),
            RestType::LongBreak => format!(
                "Continuous driving limit of {} min reached; a {} min break is required",
                self.limits.max_continuous_driving_minutes, self.limits.long_break_minutes,
            ),
            RestType::ShortBreak => format!(
                "A {} min short break is recommended",
                self.limits.short_break_minutes
            ),
        }
    }
}

/// Plan the rest stops needed to drive `trip` starting from `counters`.
///
/// Never fails: invalid limits produce a non-compliant plan with no stops,
/// and a simulation that stops making progress is cut off with a warning
/// once it exceeds a step bound derived from the trip duration. Calling this twice with the same inputs yields the same
/// plan.
#[must_use]
pub fn plan_rest_stops(
    counters: DutyCounters,
    trip: &TripPlan,
    limits: &RegulatoryLimits,
) -> RestPlan {
    simulate(
        counters,
        trip,
        limits,
        iteration_bound(trip.total_duration_minutes, limits),
    )
}

fn simulate(
    counters: DutyCounters,
    trip: &TripPlan,
    limits: &RegulatoryLimits,
    max_iterations: u64,
) -> RestPlan {
    let budget_before = counters.budget(limits);
    let mut timeline = Timeline::new(trip, limits, counters);
    let mut compliance = ComplianceResult::compliant();

    if let Err(err) = limits.validate() {
        compliance.push_warning(format!(
            "Cannot plan rest stops: {}",
            invalid_limits_reason(&err)
        ));
        return finish(timeline, compliance, budget_before);
    }

    let duration = trip.total_duration_minutes;
    if duration <= budget_before.binding_minutes() {
        timeline.drive(duration);
        return finish(timeline, compliance, budget_before);
    }

    let mut iterations: u64 = 0;
    while timeline.driven_minutes < duration {
        if iterations == max_iterations {
            compliance.push_warning(format!(
                "Rest stop planning stopped after {max_iterations} steps with {} of {duration} min planned",
                timeline.driven_minutes,
            ));
            break;
        }
        iterations += 1;

        let budget = timeline.budget();
        let segment = budget.binding_minutes().min(duration - timeline.driven_minutes);
        timeline.drive(segment);

        if timeline.driven_minutes >= duration {
            break;
        }
        if timeline.budget().daily_minutes == 0 {
            timeline.rest(RestType::DailyRest);
        } else {
            timeline.rest(RestType::LongBreak);
        }
    }

    finish(timeline, compliance, budget_before)
}

fn finish(
    timeline: Timeline<'_>,
    compliance: ComplianceResult,
    budget_before: DrivingBudget,
) -> RestPlan {
    let budget_after = timeline.budget();
    RestPlan {
        compliance,
        stops: timeline.stops,
        segments: timeline.segments,
        departure_time: timeline.trip.departure_time,
        arrival_time: timeline.clock,
        budget_before,
        budget_after,
        counters_after: timeline.counters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::RoutePoint;
    use chrono::{TimeZone, Utc};

    fn departure() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap()
    }

    fn trip(duration: u32, distance_km: f64) -> TripPlan {
        TripPlan {
            total_distance_km: distance_km,
            total_duration_minutes: duration,
            departure_time: departure(),
            route: Vec::new(),
        }
    }

    fn fresh() -> DutyCounters {
        DutyCounters::default()
    }

    fn limits() -> RegulatoryLimits {
        RegulatoryLimits::default()
    }

    fn drive_minutes(plan: &RestPlan) -> Vec<u32> {
        plan.segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Drive)
            .map(|s| s.duration_minutes)
            .collect()
    }

    #[test]
    fn should_need_no_stops_for_trip_within_budget() {
        let plan = plan_rest_stops(fresh(), &trip(200, 180.0), &limits());
        assert!(plan.compliance.compliant);
        assert!(plan.stops.is_empty());
        assert_eq!(plan.arrival_time, add_minutes(departure(), 200));
        assert_eq!(plan.budget_after.continuous_minutes, 70);
    }

    #[test]
    fn should_insert_one_long_break_for_300_minute_trip() {
        let plan = plan_rest_stops(fresh(), &trip(300, 300.0), &limits());
        assert!(plan.compliance.compliant);
        assert_eq!(plan.stops.len(), 1);

        let stop = &plan.stops[0];
        assert_eq!(stop.rest_type, RestType::LongBreak);
        assert_eq!(stop.elapsed_minutes_from_departure, 270);
        assert_eq!(stop.recommended_duration_minutes, 45);
        assert!((stop.distance_from_start_km - 270.0).abs() < 1e-9);
        assert_eq!(stop.estimated_arrival_time, add_minutes(departure(), 270));

        assert_eq!(drive_minutes(&plan), vec![270, 30]);
        assert_eq!(plan.arrival_time, add_minutes(departure(), 345));
    }

    #[test]
    fn should_insert_daily_rest_when_daily_limit_reached_for_900_minute_trip() {
        let plan = plan_rest_stops(fresh(), &trip(900, 900.0), &limits());
        assert!(plan.compliance.compliant);

        assert_eq!(plan.stops[0].rest_type, RestType::LongBreak);
        assert_eq!(plan.stops[0].elapsed_minutes_from_departure, 270);

        let daily = &plan.stops[1];
        assert_eq!(daily.rest_type, RestType::DailyRest);
        assert_eq!(daily.elapsed_minutes_from_departure, 540);
        assert_eq!(daily.recommended_duration_minutes, 660);
        assert_ne!(daily.recommended_duration_minutes, 45);
        assert_eq!(daily.estimated_arrival_time, add_minutes(departure(), 585));

        // 360 min remain after the daily rest; the continuous ceiling still
        // splits them with one more long break.
        assert_eq!(plan.stops.len(), 3);
        assert_eq!(plan.stops[2].rest_type, RestType::LongBreak);
        assert_eq!(plan.stops[2].elapsed_minutes_from_departure, 810);
        assert_eq!(drive_minutes(&plan), vec![270, 270, 270, 90]);
        assert_eq!(
            plan.arrival_time,
            add_minutes(departure(), 900 + 45 + 660 + 45)
        );
    }

    #[test]
    fn should_insert_daily_rest_first_when_daily_budget_binds_earlier() {
        let counters = DutyCounters {
            daily_driving_minutes_today: 500,
            ..fresh()
        };
        let plan = plan_rest_stops(counters, &trip(100, 100.0), &limits());
        assert_eq!(plan.stops.len(), 1);
        assert_eq!(plan.stops[0].rest_type, RestType::DailyRest);
        assert_eq!(plan.stops[0].elapsed_minutes_from_departure, 40);
        assert_eq!(drive_minutes(&plan), vec![40, 60]);
        assert_eq!(plan.counters_after.daily_driving_minutes_today, 60);
    }

    #[test]
    fn should_rest_immediately_when_continuous_budget_already_exhausted() {
        let counters = DutyCounters {
            continuous_driving_minutes: 280,
            daily_driving_minutes_today: 280,
            weekly_driving_minutes: 280,
        };
        let plan = plan_rest_stops(counters, &trip(60, 60.0), &limits());
        assert_eq!(plan.stops.len(), 1);
        assert_eq!(plan.stops[0].rest_type, RestType::LongBreak);
        assert_eq!(plan.stops[0].elapsed_minutes_from_departure, 0);
        assert_eq!(plan.stops[0].distance_from_start_km, 0.0);
        assert_eq!(plan.budget_before.continuous_minutes, 0);
        assert_eq!(drive_minutes(&plan), vec![60]);
    }

    #[test]
    fn should_rest_daily_immediately_when_both_budgets_exhausted() {
        let counters = DutyCounters {
            continuous_driving_minutes: 270,
            daily_driving_minutes_today: 540,
            weekly_driving_minutes: 540,
        };
        let plan = plan_rest_stops(counters, &trip(30, 30.0), &limits());
        assert_eq!(plan.stops.len(), 1);
        assert_eq!(plan.stops[0].rest_type, RestType::DailyRest);
        assert_eq!(plan.counters_after.weekly_driving_minutes, 570);
    }

    #[test]
    fn should_handle_zero_length_trip() {
        let plan = plan_rest_stops(fresh(), &trip(0, 0.0), &limits());
        assert!(plan.compliance.compliant);
        assert!(plan.stops.is_empty());
        assert!(plan.segments.is_empty());
        assert_eq!(plan.arrival_time, departure());
    }

    #[test]
    fn should_report_invalid_limits_without_stops() {
        let bad = RegulatoryLimits {
            long_break_minutes: 0,
            ..limits()
        };
        let plan = plan_rest_stops(fresh(), &trip(600, 600.0), &bad);
        assert!(!plan.compliance.compliant);
        assert!(plan.compliance.warnings[0].contains("long_break_minutes"));
        assert!(plan.stops.is_empty());
    }

    #[test]
    fn should_keep_stop_times_and_distances_monotonic_and_bounded() {
        let counters = DutyCounters {
            continuous_driving_minutes: 100,
            daily_driving_minutes_today: 300,
            weekly_driving_minutes: 300,
        };
        let t = trip(2000, 1650.0);
        let plan = plan_rest_stops(counters, &t, &limits());
        assert!(plan.stops.len() > 3);
        for pair in plan.stops.windows(2) {
            assert!(pair[0].estimated_arrival_time <= pair[1].estimated_arrival_time);
            assert!(pair[0].distance_from_start_km <= pair[1].distance_from_start_km);
        }
        for stop in &plan.stops {
            assert!(stop.distance_from_start_km >= 0.0);
            assert!(stop.distance_from_start_km <= t.total_distance_km);
        }
        assert_eq!(drive_minutes(&plan).iter().sum::<u32>(), 2000);
    }

    #[test]
    fn should_never_drive_past_continuous_limit() {
        let plan = plan_rest_stops(fresh(), &trip(3000, 2500.0), &limits());
        let mut continuous = 0;
        for segment in &plan.segments {
            match segment.kind {
                SegmentKind::Drive => {
                    continuous += segment.duration_minutes;
                    assert!(continuous <= limits().max_continuous_driving_minutes);
                }
                SegmentKind::Rest(_) => continuous = 0,
            }
        }
    }

    #[test]
    fn should_stay_compliant_for_very_long_trip() {
        let plan = plan_rest_stops(
            fresh(),
            &trip(3_000_000, 3_600_000.0),
            &RegulatoryLimits::default(),
        );
        assert!(plan.compliance.compliant);
        assert_eq!(plan.counters_after.weekly_driving_minutes, 3_000_000);
        assert_eq!(
            plan.segments
                .iter()
                .filter(|s| s.kind == SegmentKind::Drive)
                .map(|s| s.duration_minutes)
                .sum::<u32>(),
            3_000_000
        );
    }

    #[test]
    fn should_scale_iteration_bound_with_trip_length() {
        let limits = RegulatoryLimits::default();
        assert!(iteration_bound(3_000_000, &limits) > iteration_bound(900, &limits));
        assert!(iteration_bound(900, &limits) >= 2 * (900 / 270 + 2));
    }

    #[test]
    fn should_warn_when_step_bound_is_reached() {
        let plan = simulate(fresh(), &trip(900, 900.0), &RegulatoryLimits::default(), 2);
        assert!(!plan.compliance.compliant);
        assert_eq!(
            plan.compliance.warnings,
            vec!["Rest stop planning stopped after 2 steps with 540 of 900 min planned".to_string()]
        );
        assert_eq!(plan.stops.len(), 2);
    }

    #[test]
    fn should_return_identical_plans_for_identical_inputs() {
        let t = trip(1234, 987.0);
        let a = plan_rest_stops(fresh(), &t, &limits());
        let b = plan_rest_stops(fresh(), &t, &limits());
        assert_eq!(a, b);
    }

    #[test]
    fn should_place_stops_on_route_geometry() {
        let mut t = trip(300, 300.0);
        t.route = vec![
            RoutePoint::new(52.0, 13.0, 0.0),
            RoutePoint::new(51.5, 12.0, 150.0),
            RoutePoint::new(51.0, 11.0, 300.0).with_weather_risk(0.7),
        ];
        let plan = plan_rest_stops(fresh(), &t, &limits());
        let stop = &plan.stops[0];
        // 270 / 300 * 2 = 1.8 -> last point
        assert_eq!(stop.latitude, Some(51.0));
        assert_eq!(stop.longitude, Some(11.0));
        assert_eq!(stop.weather_risk, Some(0.7));
    }

    #[test]
    fn should_omit_coordinates_without_route() {
        let plan = plan_rest_stops(fresh(), &trip(300, 300.0), &limits());
        assert!(plan.stops[0].latitude.is_none());
        assert!(plan.stops[0].longitude.is_none());
    }

    #[test]
    fn should_sum_rest_minutes() {
        let plan = plan_rest_stops(fresh(), &trip(900, 900.0), &limits());
        assert_eq!(plan.total_rest_minutes(), 45 + 660 + 45);
        assert!(plan.stops_required());
    }

    #[test]
    fn should_serialize_rest_type_and_segment_kind() {
        let json = serde_json::to_value(SegmentKind::Rest(RestType::DailyRest)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "rest", "rest_type": "DAILY_REST"}));
        let json = serde_json::to_value(SegmentKind::Drive).unwrap();
        assert_eq!(json, serde_json::json!({"type": "drive"}));
    }
}
