//! Driver — the record that owns a [`DutyState`].

use serde::{Deserialize, Serialize};

use crate::duty::DutyState;
use crate::error::{HaulPlanError, ValidationError};
use crate::id::DriverId;

/// A driver and their live duty state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub duty: DutyState,
}

impl Driver {
    /// Create a builder for constructing a [`Driver`].
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::Validation`] when `name` is blank.
    pub fn validate(&self) -> Result<(), HaulPlanError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Driver`].
#[derive(Debug, Default)]
pub struct DriverBuilder {
    id: Option<DriverId>,
    name: Option<String>,
    duty: Option<DutyState>,
}

impl DriverBuilder {
    #[must_use]
    pub fn id(mut self, id: DriverId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn duty(mut self, duty: DutyState) -> Self {
        self.duty = Some(duty);
        self
    }

    /// Consume the builder, validate, and return a [`Driver`].
    ///
    /// Without an explicit duty state the driver starts available with zero
    /// counters as of now.
    ///
    /// # Errors
    ///
    /// Returns [`HaulPlanError::Validation`] if `name` is missing or blank.
    pub fn build(self) -> Result<Driver, HaulPlanError> {
        let driver = Driver {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            duty: self
                .duty
                .unwrap_or_else(|| DutyState::new(crate::time::now())),
        };
        driver.validate()?;
        Ok(driver)
    }
}
