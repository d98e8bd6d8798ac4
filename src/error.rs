//! Error types for the registry core.
//!
//! Validation problems are handled at the operation boundary and never reach
//! the audit log. Storage failures always do, and their `Display` is the
//! generic message shown to users.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// A raw field value the validator refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid year {0:?}. Please enter a number between 1 and 7.")]
    InvalidYear(String),

    #[error("Invalid house {0:?}. Please enter one of the four houses.")]
    InvalidHouse(String),

    #[error("No name entered.")]
    EmptyName,
}

/// Failures of the JSON audit logs.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The event log exists but is not a JSON array. The entry being
    /// appended is lost.
    #[error("log file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode log entries: {0}")]
    Encode(#[source] serde_json::Error),
}

/// The store operation a failure belongs to. Each one maps onto the fixed
/// error-log message and the user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddStudent,
    AddCourse,
    AddAdmin,
    ListStudents,
    StudentsByYear,
    StudentsByHouse,
    ListAdmins,
    ListCourses,
    Delete,
    SeedCourses,
    SeedAdmins,
}

impl Action {
    /// Message recorded in the error log.
    pub fn log_message(self) -> &'static str {
        match self {
            Action::AddStudent => "Failed to add student data",
            Action::AddCourse => "Failed to add course data",
            Action::AddAdmin => "Failed to add admin data",
            Action::ListStudents => "Failed to iterate student data",
            Action::StudentsByYear => "Failed to search student data by year",
            Action::StudentsByHouse => "Failed to search student data by house",
            Action::ListAdmins => "Failed to access admin list",
            Action::ListCourses => "Failed to access course list",
            Action::Delete => "Failed to remove data",
            Action::SeedCourses => "Failed to populate the Courses table",
            Action::SeedAdmins => "Failed to populate the HogwartAdmin table",
        }
    }

    /// Phrase slotted into the generic user message.
    fn user_phrase(self) -> &'static str {
        match self {
            Action::AddStudent => "adding student data",
            Action::AddCourse => "adding course data",
            Action::AddAdmin => "adding admin data",
            Action::ListStudents => "iterating student data",
            Action::StudentsByYear => "searching student data by year",
            Action::StudentsByHouse => "searching student data by house",
            Action::ListAdmins => "accessing admin data",
            Action::ListCourses => "accessing course data",
            Action::Delete => "removing data",
            Action::SeedCourses => "populating the Courses table",
            Action::SeedAdmins => "populating the HogwartAdmin table",
        }
    }

    /// Generic diagnostic shown to the user. It never includes the cause;
    /// that goes to the error log.
    pub fn user_message(self) -> String {
        format!(
            "An error occurred while {}. Please check the hogwarts_error_log file for more information.",
            self.user_phrase()
        )
    }
}

/// Failure of a store operation, as seen by a front-end.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// SQLite rejected the operation. Already recorded in the error log.
    #[error("{}", .action.user_message())]
    Storage {
        action: Action,
        #[source]
        source: rusqlite::Error,
    },

    /// The mutation was committed but its event could not be appended.
    /// Already recorded in the error log.
    #[error("{}", .action.user_message())]
    EventLog {
        action: Action,
        #[source]
        source: AuditError,
    },
}

impl RecordError {
    pub fn is_validation(&self) -> bool {
        matches!(self, RecordError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_show_only_the_generic_message() {
        let err = RecordError::Storage {
            action: Action::AddStudent,
            source: rusqlite::Error::InvalidQuery,
        };
        assert_eq!(
            err.to_string(),
            "An error occurred while adding student data. Please check the hogwarts_error_log file for more information."
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn validation_errors_pass_through() {
        let err = RecordError::from(ValidationError::InvalidYear("9".into()));
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Invalid year"));
    }
}
