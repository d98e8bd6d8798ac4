//! Persistence module split across logical submodules. The per-table files
//! hold the raw queries; [`Store`] wraps them with validation and audit
//! logging and is the only public entry point.

mod admins;
mod connection;
mod courses;
mod delete;
mod records;
mod seed;
mod store;
mod students;

pub use connection::{ensure_schema, open_database};
pub use delete::{Cancellation, DeleteLookup, DeleteOutcome, PendingDelete};
pub use seed::{SeedFailure, SeedReport, SEED_ADMINS, SEED_COURSES};
pub use store::Store;

#[cfg(test)]
pub(crate) use store::test_support;
