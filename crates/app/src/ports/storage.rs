//! Storage port — repository trait for driver records.

use std::future::Future;

use haulplan_domain::driver::Driver;
use haulplan_domain::error::HaulPlanError;
use haulplan_domain::id::DriverId;

/// Repository for persisting and querying [`Driver`]s.
///
/// Implementations only store records; serializing concurrent duty
/// transitions for one driver is the job of the driver service.
pub trait DriverRepository {
    /// Create a new driver in storage.
    fn create(&self, driver: Driver) -> impl Future<Output = Result<Driver, HaulPlanError>> + Send;

    /// Get a driver by its unique identifier.
    fn get_by_id(
        &self,
        id: DriverId,
    ) -> impl Future<Output = Result<Option<Driver>, HaulPlanError>> + Send;

    /// Get all drivers.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Driver>, HaulPlanError>> + Send;

    /// Replace an existing driver record.
    fn update(&self, driver: Driver) -> impl Future<Output = Result<Driver, HaulPlanError>> + Send;
}
