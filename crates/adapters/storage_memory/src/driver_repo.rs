//! In-memory implementation of [`DriverRepository`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use haulplan_app::ports::DriverRepository;
use haulplan_domain::driver::Driver;
use haulplan_domain::error::{HaulPlanError, NotFoundError};
use haulplan_domain::id::DriverId;

use crate::error::StorageError;

/// Process-local driver store.
///
/// Clones share the same underlying map, so one store can back several
/// services.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDriverRepository {
    drivers: Arc<Mutex<HashMap<DriverId, Driver>>>,
}

impl InMemoryDriverRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored drivers.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if a writer panicked.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }

    /// Whether the store holds no drivers.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if a writer panicked.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<DriverId, Driver>>, StorageError> {
        self.drivers.lock().map_err(|_| StorageError::Poisoned)
    }

    fn insert_new(&self, driver: Driver) -> Result<Driver, HaulPlanError> {
        let mut drivers = self.lock()?;
        if drivers.contains_key(&driver.id) {
            return Err(StorageError::Duplicate(driver.id).into());
        }
        drivers.insert(driver.id, driver.clone());
        Ok(driver)
    }

    fn replace(&self, driver: Driver) -> Result<Driver, HaulPlanError> {
        let mut drivers = self.lock()?;
        match drivers.get_mut(&driver.id) {
            Some(slot) => {
                slot.clone_from(&driver);
                Ok(driver)
            }
            None => Err(NotFoundError {
                entity: "Driver",
                id: driver.id.to_string(),
            }
            .into()),
        }
    }
}

impl DriverRepository for InMemoryDriverRepository {
    fn create(&self, driver: Driver) -> impl Future<Output = Result<Driver, HaulPlanError>> + Send {
        let result = self.insert_new(driver);
        async move { result }
    }

    fn get_by_id(
        &self,
        id: DriverId,
    ) -> impl Future<Output = Result<Option<Driver>, HaulPlanError>> + Send {
        let result = self
            .lock()
            .map(|drivers| drivers.get(&id).cloned())
            .map_err(HaulPlanError::from);
        async move { result }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Driver>, HaulPlanError>> + Send {
        let result = self
            .lock()
            .map(|drivers| {
                let mut all: Vec<Driver> = drivers.values().cloned().collect();
                all.sort_by(|a, b| a.name.cmp(&b.name));
                all
            })
            .map_err(HaulPlanError::from);
        async move { result }
    }

    fn update(&self, driver: Driver) -> impl Future<Output = Result<Driver, HaulPlanError>> + Send {
        let result = self.replace(driver);
        async move { result }
    }
}
