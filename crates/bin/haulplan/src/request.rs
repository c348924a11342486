//! Planning requests read by the CLI and the wiring that answers them.

use haulplan_adapter_storage_memory::InMemoryDriverRepository;
use haulplan_app::services::driver_service::DriverService;
use haulplan_app::services::trip_planning_service::TripPlanningService;
use haulplan_domain::compliance::ComplianceResult;
use haulplan_domain::driver::Driver;
use haulplan_domain::duty::{DutyState, DutyStatus};
use haulplan_domain::error::HaulPlanError;
use haulplan_domain::id::DriverId;
use haulplan_domain::limits::RegulatoryLimits;
use haulplan_domain::summary::TripAnalysis;
use haulplan_domain::time::Timestamp;
use haulplan_domain::trip::TripPlan;
use serde::Deserialize;

/// A trip to evaluate for one driver.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanRequest {
    pub driver: DriverInput,
    /// Status changes replayed, in order, before the trip is evaluated.
    #[serde(default)]
    pub events: Vec<DutyEvent>,
    pub trip: TripPlan,
    /// Instant the compliance gate is evaluated at. Defaults to departure.
    #[serde(default)]
    pub evaluate_at: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverInput {
    pub name: String,
    /// Duty state to start from. A fresh state is used when absent.
    #[serde(default)]
    pub duty: Option<DutyState>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DutyEvent {
    pub status: DutyStatus,
    pub at: Timestamp,
}

impl PlanRequest {
    /// Parse a request from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    fn evaluation_instant(&self) -> Timestamp {
        self.evaluate_at.unwrap_or(self.trip.departure_time)
    }

    fn initial_duty(&self) -> DutyState {
        self.driver.duty.clone().unwrap_or_else(|| {
            let start = self.events.first().map_or(self.trip.departure_time, |e| e.at);
            DutyState::new(start)
        })
    }
}

/// Services wired over a fresh in-memory driver store.
pub struct Planner {
    drivers: DriverService<InMemoryDriverRepository>,
    trips: TripPlanningService<InMemoryDriverRepository>,
}

impl Planner {
    #[must_use]
    pub fn new(limits: RegulatoryLimits) -> Self {
        let repo = InMemoryDriverRepository::new();
        Self {
            drivers: DriverService::new(repo.clone(), limits),
            trips: TripPlanningService::new(repo, limits),
        }
    }

    /// Register the request's driver and replay its duty events.
    async fn prepare(&self, request: &PlanRequest) -> Result<DriverId, HaulPlanError> {
        let driver = Driver::builder()
            .name(request.driver.name.clone())
            .duty(request.initial_duty())
            .build()?;
        let driver = self.drivers.create_driver(driver).await?;
        for event in &request.events {
            self.drivers
                .record_status_change(driver.id, event.status, event.at)
                .await?;
        }
        tracing::debug!(
            driver = %driver.name,
            events = request.events.len(),
            "driver prepared"
        );
        Ok(driver.id)
    }

    /// Gate the trip and plan its rest stops.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::Validation`] when the driver or trip is
    /// malformed.
    pub async fn plan(&self, request: &PlanRequest) -> Result<TripAnalysis, HaulPlanError> {
        let id = self.prepare(request).await?;
        self.trips
            .plan_trip(id, &request.trip, request.evaluation_instant())
            .await
    }

    /// Only answer whether the trip can be driven without stopping.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::Validation`] when the driver is malformed.
    pub async fn check(&self, request: &PlanRequest) -> Result<ComplianceResult, HaulPlanError> {
        let id = self.prepare(request).await?;
        self.trips
            .check_trip(
                id,
                request.trip.total_duration_minutes,
                request.evaluation_instant(),
            )
            .await
    }
}
