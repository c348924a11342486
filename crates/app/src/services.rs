//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! Regulatory limits are injected the same way, at construction.

pub mod driver_service;
pub mod trip_planning_service;
