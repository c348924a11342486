//! # haulplan-adapter-storage-memory
//!
//! Process-local storage adapter for driver records.
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `haulplan-app::ports::storage`
//! - Keep driver records in a shared, lock-protected map
//!
//! ## Dependency rule
//! Depends on `haulplan-app` (for port traits) and `haulplan-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod driver_repo;
pub mod error;

pub use driver_repo::InMemoryDriverRepository;
pub use error::StorageError;
