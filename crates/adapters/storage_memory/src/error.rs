//! Storage-specific error type for the in-memory driver store.

use haulplan_domain::error::HaulPlanError;
use haulplan_domain::id::DriverId;

/// Errors originating from the in-memory storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A driver with the same id is already stored.
    #[error("driver {0} already exists")]
    Duplicate(DriverId),

    /// A writer panicked while holding the store lock.
    #[error("driver store lock poisoned")]
    Poisoned,
}

impl From<StorageError> for HaulPlanError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
