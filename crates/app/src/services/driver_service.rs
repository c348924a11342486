//! Driver service — use-cases for driver records and duty status changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use haulplan_domain::driver::Driver;
use haulplan_domain::duty::{DutyCounters, DutyStatus};
use haulplan_domain::error::{HaulPlanError, NotFoundError};
use haulplan_domain::id::DriverId;
use haulplan_domain::limits::RegulatoryLimits;
use haulplan_domain::time::Timestamp;

use crate::ports::DriverRepository;

/// Application service for driver records.
///
/// Status changes for one driver are applied one at a time: each driver has
/// its own async lock held across the load-transition-save sequence. Changes
/// for different drivers do not wait on each other.
pub struct DriverService<R> {
    repo: R,
    limits: RegulatoryLimits,
    locks: Mutex<HashMap<DriverId, Arc<tokio::sync::Mutex<()>>>>,
}

impl<R: DriverRepository> DriverService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R, limits: RegulatoryLimits) -> Self {
        Self {
            repo,
            limits,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new driver after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, driver), fields(driver_name = %driver.name))]
    pub async fn create_driver(&self, driver: Driver) -> Result<Driver, HaulPlanError> {
        driver.validate()?;
        self.repo.create(driver).await
    }

    /// Look up a driver by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::NotFound`] when no driver with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_driver(&self, id: DriverId) -> Result<Driver, HaulPlanError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Driver",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all drivers.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_drivers(&self) -> Result<Vec<Driver>, HaulPlanError> {
        self.repo.get_all().await
    }

    /// Copy of a driver's counters, safe to plan against while other status
    /// changes proceed.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::NotFound`] when the driver does not exist,
    /// or a storage error from the repository.
    pub async fn duty_snapshot(&self, id: DriverId) -> Result<DutyCounters, HaulPlanError> {
        Ok(self.get_driver(id).await?.duty.snapshot())
    }

    /// Record that a driver switched to `status` at `at`.
    ///
    /// A change to the status the driver is already in leaves the record
    /// untouched. A timestamp older than the current status start is applied
    /// as a zero-length change and logged.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::NotFound`] when the driver does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn record_status_change(
        &self,
        id: DriverId,
        status: DutyStatus,
        at: Timestamp,
    ) -> Result<Driver, HaulPlanError> {
        // Unknown drivers never get a lock entry.
        self.get_driver(id).await?;

        let lock = self.lock_for(id);
        let result = {
            let _guard = lock.lock().await;
            self.apply_status_change(id, status, at).await
        };
        self.release_lock(id, lock);
        result
    }

    async fn apply_status_change(
        &self,
        id: DriverId,
        status: DutyStatus,
        at: Timestamp,
    ) -> Result<Driver, HaulPlanError> {
        let mut driver = self.get_driver(id).await?;
        let transition = driver.duty.transition(status, at, &self.limits);
        if !transition.applied {
            tracing::debug!(%status, "driver already in requested status");
            return Ok(driver);
        }
        if transition.clock_skew {
            tracing::warn!(
                from = %transition.from,
                to = %transition.to,
                "status change predates current status start, applying with zero elapsed time"
            );
        }
        tracing::debug!(
            from = %transition.from,
            to = %transition.to,
            elapsed_minutes = transition.elapsed_minutes,
            continuous_reset = transition.continuous_reset,
            "duty status changed"
        );
        self.repo.update(driver).await
    }

    fn lock_for(&self, id: DriverId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id).or_default())
    }

    /// Drop the caller's handle and forget the lock once nobody else holds it.
    ///
    /// Handles are only cloned under the map lock, so a count of one seen
    /// here means no other change for this driver is waiting.
    fn release_lock(&self, id: DriverId, lock: Arc<tokio::sync::Mutex<()>>) {
        drop(lock);
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(&id).is_some_and(|held| Arc::strong_count(held) == 1) {
            locks.remove(&id);
        }
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
