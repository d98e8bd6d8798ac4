//! Delete-by-name, split into a lookup and a confirmed execution so callers
//! can put a Y/N prompt (or a modal) in between.
//!
//! `AwaitingInput -> Lookup -> AwaitingConfirmation -> Deleted | Cancelled`,
//! with `NotFound` and an empty-name `Cancelled` ending the request early.
//! Only a confirmed delete touches the database or the logs.

use serde_json::json;

use crate::audit::details;
use crate::error::{Action, RecordResult};
use crate::models::{Record, Table};
use crate::validate;

use super::records::delete_by_name;
use super::store::Store;

/// Why a delete request ended without removing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancellation {
    EmptyName,
    Declined,
}

/// Terminal state of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Every row with the name is gone. `count` exceeds one for duplicates.
    Deleted { table: Table, name: String, count: usize },
    NotFound { table: Table, name: String },
    Cancelled(Cancellation),
}

/// Result of looking a name up before asking for confirmation.
#[derive(Debug)]
pub enum DeleteLookup {
    Found(PendingDelete),
    NotFound { table: Table, name: String },
    Cancelled(Cancellation),
}

/// A delete that found at least one row and is waiting for a yes or no.
/// Only [`Store::begin_delete`] can build one.
#[derive(Debug, Clone)]
pub struct PendingDelete {
    table: Table,
    name: String,
    first_match: Record,
}

impl PendingDelete {
    pub fn table(&self) -> Table {
        self.table
    }

    /// The trimmed name that will be matched.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lowest-id row carrying the name.
    pub fn first_match(&self) -> &Record {
        &self.first_match
    }

    /// Question shown to the user before deleting.
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to delete {} '{}'? (Y/N): ",
            self.table.noun(),
            self.name
        )
    }

    /// Decline the request. Nothing is written anywhere.
    pub fn decline(self) -> DeleteOutcome {
        tracing::debug!(table = %self.table, name = %self.name, "deletion declined");
        DeleteOutcome::Cancelled(Cancellation::Declined)
    }
}

impl Store {
    /// Trim `raw_name` and look it up in `table`. Blank names cancel the
    /// request and a miss ends it; neither writes to any log.
    pub fn begin_delete(&self, table: Table, raw_name: &str) -> RecordResult<DeleteLookup> {
        let name = match validate::delete_target(raw_name) {
            Ok(name) => name,
            Err(_) => return Ok(DeleteLookup::Cancelled(Cancellation::EmptyName)),
        };

        match self.find_by_name(table, name)? {
            Some(first_match) => Ok(DeleteLookup::Found(PendingDelete {
                table,
                name: name.to_string(),
                first_match,
            })),
            None => Ok(DeleteLookup::NotFound {
                table,
                name: name.to_string(),
            }),
        }
    }

    /// Carry out a confirmed delete and log one event naming the record.
    pub fn confirm_delete(&self, pending: PendingDelete) -> RecordResult<DeleteOutcome> {
        let PendingDelete { table, name, .. } = pending;
        let count = delete_by_name(&self.conn, table, &name)
            .map_err(|err| self.storage_failure(Action::Delete, err))?;
        tracing::info!(%table, name = %name, count, "records deleted");

        let (event_type, key) = match table {
            Table::Students => ("Student Deleted!", "Name"),
            Table::Courses => ("Course Deleted!", "Course Name"),
            Table::HogwartAdmin => ("Admin Deleted!", "Name"),
        };
        self.record_event(Action::Delete, event_type, details([(key, json!(name))]))?;

        Ok(DeleteOutcome::Deleted { table, name, count })
    }

    /// Whole request in one call: look up, ask `confirm`, then delete or not.
    /// `confirm` is only called when something matched.
    pub fn delete_record<F>(&self, table: Table, raw_name: &str, confirm: F) -> RecordResult<DeleteOutcome>
    where
        F: FnOnce(&PendingDelete) -> bool,
    {
        match self.begin_delete(table, raw_name)? {
            DeleteLookup::Found(pending) => {
                if confirm(&pending) {
                    self.confirm_delete(pending)
                } else {
                    Ok(pending.decline())
                }
            }
            DeleteLookup::NotFound { table, name } => Ok(DeleteOutcome::NotFound { table, name }),
            DeleteLookup::Cancelled(reason) => Ok(DeleteOutcome::Cancelled(reason)),
        }
    }
}
