//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use haulplan_domain::driver::Driver;
use haulplan_domain::error::{HaulPlanError, NotFoundError};
use haulplan_domain::id::DriverId;

use crate::ports::DriverRepository;

#[derive(Clone, Default)]
pub struct InMemoryDriverRepo {
    store: Arc<Mutex<HashMap<DriverId, Driver>>>,
}

impl DriverRepository for InMemoryDriverRepo {
    fn create(&self, driver: Driver) -> impl Future<Output = Result<Driver, HaulPlanError>> + Send {
        let mut store = self.store.lock().unwrap();
        store.insert(driver.id, driver.clone());
        async { Ok(driver) }
    }

    fn get_by_id(
        &self,
        id: DriverId,
    ) -> impl Future<Output = Result<Option<Driver>, HaulPlanError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Driver>, HaulPlanError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<Driver> = store.values().cloned().collect();
        async { Ok(result) }
    }

    fn update(&self, driver: Driver) -> impl Future<Output = Result<Driver, HaulPlanError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = if store.contains_key(&driver.id) {
            store.insert(driver.id, driver.clone());
            Ok(driver)
        } else {
            Err(NotFoundError {
                entity: "Driver",
                id: driver.id.to_string(),
            }
            .into())
        };
        async { result }
    }
}
