//! Trip planning service — evaluates a trip against a stored driver's duty
//! counters.

use haulplan_domain::compliance::{ComplianceResult, check_compliance};
use haulplan_domain::driver::Driver;
use haulplan_domain::error::{HaulPlanError, NotFoundError};
use haulplan_domain::id::DriverId;
use haulplan_domain::limits::RegulatoryLimits;
use haulplan_domain::planner::plan_rest_stops;
use haulplan_domain::summary::TripAnalysis;
use haulplan_domain::time::Timestamp;
use haulplan_domain::trip::TripPlan;

use crate::ports::DriverRepository;

/// Application service for compliance gating and rest-stop planning.
///
/// Reads a copy of the driver record and never writes it back, so planning
/// can run while status changes for the same driver are being recorded.
pub struct TripPlanningService<R> {
    repo: R,
    limits: RegulatoryLimits,
}

impl<R: DriverRepository> TripPlanningService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R, limits: RegulatoryLimits) -> Self {
        Self { repo, limits }
    }

    /// The limits every evaluation runs against.
    #[must_use]
    pub fn limits(&self) -> &RegulatoryLimits {
        &self.limits
    }

    async fn load_driver(&self, id: DriverId) -> Result<Driver, HaulPlanError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Driver",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Fast yes/no check: can the driver cover `trip_duration_minutes` of
    /// driving from `at` without a stop?
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::NotFound`] when the driver does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn check_trip(
        &self,
        id: DriverId,
        trip_duration_minutes: u32,
        at: Timestamp,
    ) -> Result<ComplianceResult, HaulPlanError> {
        let driver = self.load_driver(id).await?;
        let result = check_compliance(&driver.duty, trip_duration_minutes, &self.limits, at);
        if !result.compliant {
            tracing::debug!(warnings = result.warnings.len(), "trip fails compliance gate");
        }
        Ok(result)
    }

    /// Gate the trip as of `at` and plan the rest stops it needs.
    ///
    /// `at` only affects the gate; the plan always starts at departure.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::Validation`] when the trip is malformed,
    /// [`HaulPlanError::NotFound`] when the driver does not exist, or a
    /// storage error from the repository.
    #[tracing::instrument(
        skip(self, trip),
        fields(duration_minutes = trip.total_duration_minutes, distance_km = trip.total_distance_km)
    )]
    pub async fn plan_trip(
        &self,
        id: DriverId,
        trip: &TripPlan,
        at: Timestamp,
    ) -> Result<TripAnalysis, HaulPlanError> {
        trip.validate()?;
        let driver = self.load_driver(id).await?;

        let gate = check_compliance(&driver.duty, trip.total_duration_minutes, &self.limits, at);
        let plan = plan_rest_stops(driver.duty.snapshot(), trip, &self.limits);

        if plan.compliance.compliant {
            tracing::info!(
                driver = %driver.name,
                stops = plan.stops.len(),
                rest_minutes = plan.total_rest_minutes(),
                arrival = %plan.arrival_time,
                "trip planned"
            );
        } else {
            for warning in &plan.compliance.warnings {
                tracing::warn!(driver = %driver.name, %warning, "trip could not be planned");
            }
        }

        Ok(TripAnalysis::new(driver.name, gate, plan))
    }
}
