//! # haulplan-domain
//!
//! Pure domain model for the haulplan driving-time compliance engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Regulatory limits** (continuous/daily ceilings, break lengths)
//! - Define **Duty state** (status + rolling counters) and its transition rules
//! - Evaluate **Compliance** of a trip against the current duty state
//! - **Plan rest stops** along a trip timeline and place them on the route
//! - Render a **Trip analysis** summary
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Every function is synchronous and deterministic given its inputs; the
//! regulatory limits are always passed in explicitly.

pub mod error;
pub mod id;
pub mod time;

pub mod compliance;
pub mod driver;
pub mod duty;
pub mod limits;
pub mod planner;
pub mod route;
pub mod summary;
pub mod trip;
