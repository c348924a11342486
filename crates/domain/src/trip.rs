//! Trip plan — the read-only description of a journey to evaluate.

use serde::{Deserialize, Serialize};

use crate::error::{HaulPlanError, ValidationError};
use crate::time::Timestamp;

/// One point of the route geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Distance travelled from the start of the route up to this point.
    pub cumulative_distance_km: f64,
    /// Weather risk score supplied by the routing provider, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_risk: Option<f64>,
}

impl RoutePoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, cumulative_distance_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            cumulative_distance_km,
            weather_risk: None,
        }
    }

    #[must_use]
    pub fn with_weather_risk(mut self, risk: f64) -> Self {
        self.weather_risk = Some(risk);
        self
    }
}

/// A planned trip as produced by the routing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub total_distance_km: f64,
    pub total_duration_minutes: u32,
    pub departure_time: Timestamp,
    #[serde(default)]
    pub route: Vec<RoutePoint>,
}

impl TripPlan {
    /// Create a builder for constructing a [`TripPlan`].
    #[must_use]
    pub fn builder() -> TripPlanBuilder {
        TripPlanBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::Validation`] when:
    /// - `total_distance_km` is negative or not finite ([`ValidationError::InvalidDistance`])
    /// - route cumulative distances decrease ([`ValidationError::UnorderedRoute`])
    pub fn validate(&self) -> Result<(), HaulPlanError> {
        if !self.total_distance_km.is_finite() || self.total_distance_km < 0.0 {
            return Err(ValidationError::InvalidDistance.into());
        }
        if let Some(index) = self
            .route
            .windows(2)
            .position(|pair| pair[1].cumulative_distance_km < pair[0].cumulative_distance_km)
        {
            return Err(ValidationError::UnorderedRoute { index: index + 1 }.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`TripPlan`].
#[derive(Debug, Default)]
pub struct TripPlanBuilder {
    total_distance_km: Option<f64>,
    total_duration_minutes: Option<u32>,
    departure_time: Option<Timestamp>,
    route: Vec<RoutePoint>,
}

impl TripPlanBuilder {
    #[must_use]
    pub fn total_distance_km(mut self, km: f64) -> Self {
        self.total_distance_km = Some(km);
        self
    }

    #[must_use]
    pub fn total_duration_minutes(mut self, minutes: u32) -> Self {
        self.total_duration_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn departure_time(mut self, ts: Timestamp) -> Self {
        self.departure_time = Some(ts);
        self
    }

    #[must_use]
    pub fn point(mut self, point: RoutePoint) -> Self {
        self.route.push(point);
        self
    }

    #[must_use]
    pub fn route(mut self, route: Vec<RoutePoint>) -> Self {
        self.route = route;
        self
    }

    /// Consume the builder, validate, and return a [`TripPlan`].
    ///
    /// Missing distance and duration default to zero; a missing departure
    /// defaults to now.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::Validation`] if the plan breaks an invariant.
    pub fn build(self) -> Result<TripPlan, HaulPlanError> {
        let trip = TripPlan {
            total_distance_km: self.total_distance_km.unwrap_or_default(),
            total_duration_minutes: self.total_duration_minutes.unwrap_or_default(),
            departure_time: self.departure_time.unwrap_or_else(crate::time::now),
            route: self.route,
        };
        trip.validate()?;
        Ok(trip)
    }
}
