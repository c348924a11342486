//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`HaulPlanError`] via `#[from]` or an explicit `From` impl.

/// Base error shared by the domain, application, and adapter layers.
#[derive(Debug, thiserror::Error)]
pub enum HaulPlanError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required name was missing or blank.
    #[error("name must not be empty")]
    EmptyName,

    /// A regulatory limit was configured as zero.
    #[error("regulatory limit `{name}` must be greater than zero")]
    NonPositiveLimit {
        /// Field name of the offending limit.
        name: &'static str,
    },

    /// A trip distance was negative or not a finite number.
    #[error("trip distance must be a finite, non-negative number of kilometres")]
    InvalidDistance,

    /// Route points must carry non-decreasing cumulative distances.
    #[error("route point {index} goes backwards along the route")]
    UnorderedRoute {
        /// Index of the first point whose cumulative distance decreases.
        index: usize,
    },
}

/// A lookup by identifier returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
