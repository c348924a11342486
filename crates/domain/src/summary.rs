//! Trip analysis — the combined gate and plan for one driver, with a
//! human-readable rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compliance::ComplianceResult;
use crate::duty::DrivingBudget;
use crate::planner::{RestPlan, RestStopRecommendation};
use crate::time::Timestamp;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Everything the caller needs to report on a planned trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripAnalysis {
    pub driver_name: String,
    /// Single-shot check: can the trip be driven without stopping?
    pub gate: ComplianceResult,
    pub plan: RestPlan,
}

impl TripAnalysis {
    #[must_use]
    pub fn new(driver_name: impl Into<String>, gate: ComplianceResult, plan: RestPlan) -> Self {
        Self {
            driver_name: driver_name.into(),
            gate,
            plan,
        }
    }

    #[must_use]
    pub fn departure_time(&self) -> Timestamp {
        self.plan.departure_time
    }

    #[must_use]
    pub fn arrival_time(&self) -> Timestamp {
        self.plan.arrival_time
    }

    /// Whether the trip can be completed legally, with the planned stops.
    #[must_use]
    pub fn feasible(&self) -> bool {
        self.plan.compliance.compliant
    }
}

fn write_budget(f: &mut fmt::Formatter<'_>, label: &str, budget: &DrivingBudget) -> fmt::Result {
    writeln!(
        f,
        "  {label:<15}{} min continuous, {} min daily",
        budget.continuous_minutes, budget.daily_minutes
    )
}

fn write_stop(
    f: &mut fmt::Formatter<'_>,
    index: usize,
    stop: &RestStopRecommendation,
) -> fmt::Result {
    write!(
        f,
        "    {index}. {} at {} min driven ({:.1} km), {} for {} min",
        stop.rest_type,
        stop.elapsed_minutes_from_departure,
        stop.distance_from_start_km,
        stop.estimated_arrival_time.format(TIME_FORMAT),
        stop.recommended_duration_minutes,
    )?;
    if let (Some(lat), Some(lon)) = (stop.latitude, stop.longitude) {
        write!(f, " @ {lat:.5},{lon:.5}")?;
    }
    if let Some(risk) = stop.weather_risk {
        write!(f, " [weather risk {risk:.2}]")?;
    }
    writeln!(f)?;
    writeln!(f, "       {}", stop.reason)
}

impl fmt::Display for TripAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = &self.plan;
        writeln!(f, "Trip analysis for {}", self.driver_name)?;
        writeln!(
            f,
            "  {:<15}{}",
            "Departure:",
            plan.departure_time.format(TIME_FORMAT)
        )?;
        writeln!(f, "  {:<15}{}", "Arrival:", plan.arrival_time.format(TIME_FORMAT))?;

        let verdict = match (plan.compliance.compliant, plan.stops.len()) {
            (false, _) => "NOT COMPLIANT".to_string(),
            (true, 0) => "compliant, no rest stops needed".to_string(),
            (true, 1) => "compliant with 1 rest stop".to_string(),
            (true, n) => format!("compliant with {n} rest stops"),
        };
        writeln!(f, "  {:<15}{verdict}", "Verdict:")?;
        for warning in &self.gate.warnings {
            writeln!(f, "    ! without stops: {warning}")?;
        }
        for warning in &plan.compliance.warnings {
            writeln!(f, "    ! plan: {warning}")?;
        }

        write_budget(f, "Budget before:", &plan.budget_before)?;
        write_budget(f, "Budget after:", &plan.budget_after)?;

        if plan.stops.is_empty() {
            return Ok(());
        }
        writeln!(
            f,
            "  Rest stops ({} min resting in total):",
            plan.total_rest_minutes()
        )?;
        for (i, stop) in plan.stops.iter().enumerate() {
            write_stop(f, i + 1, stop)?;
        }
        Ok(())
    }
}
