//! Core library for the Hogwarts registry: the SQLite-backed record store,
//! its validation rules, and the JSON audit logs every mutation and failure
//! is written to. The `bin` target adds two front-ends on top; both go
//! through [`Store`] and nothing else.
pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ui;
pub mod validate;

/// Convenience re-exports for the persistence layer.
pub use db::{Cancellation, DeleteLookup, DeleteOutcome, PendingDelete, SeedReport, Store};

pub use audit::{AuditLog, Details, ErrorEntry, EventEntry};
pub use config::Config;
pub use error::{Action, AuditError, RecordError, RecordResult, ValidationError};
pub use models::{Admin, Course, House, Record, Student, StudentDraft, StudentFilter, Table, Year};

/// The interactive entry points.
pub use ui::{run_app, App, Menu};
