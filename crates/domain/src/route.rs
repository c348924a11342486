//! Rest stop projection — placing a distance along the trip on its geometry.

use crate::trip::{RoutePoint, TripPlan};

/// Find the route point that stands in for `distance_from_start_km`.
///
/// The point is picked proportionally: the fraction of the total distance is
/// scaled onto the point indices and rounded. Returns `None` when the route
/// has no points; callers must then leave the location empty.
#[must_use]
pub fn locate(trip: &TripPlan, distance_from_start_km: f64) -> Option<&RoutePoint> {
    let last = trip.route.len().checked_sub(1)?;
    let fraction = if trip.total_distance_km > 0.0 && distance_from_start_km.is_finite() {
        (distance_from_start_km / trip.total_distance_km).clamp(0.0, 1.0)
    } else {
        0.0
    };
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let index = (fraction * last as f64).round() as usize;
    trip.route.get(index.min(last))
}
