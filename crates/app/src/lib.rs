//! # haulplan-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DriverRepository` — storage for driver records and their duty state
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DriverService` — register drivers, record duty status changes
//!   - `TripPlanningService` — compliance gate and rest-stop planning
//! - Serialize duty transitions per driver; planning works on snapshots
//!
//! ## Dependency rule
//! Depends on `haulplan-domain` only (plus `tokio::sync` for per-driver locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
