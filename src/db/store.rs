use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::audit::{details, AuditLog, Details};
use crate::config::Config;
use crate::error::{Action, RecordError, RecordResult};
use crate::models::{Admin, Course, Record, Student, StudentDraft, StudentFilter, Table};
use crate::validate;

use super::admins::{fetch_admins, insert_admin};
use super::connection::open_database;
use super::courses::{fetch_courses, insert_course};
use super::records::find_by_name;
use super::students::{fetch_students, insert_student};

/// Owns the SQLite connection and the audit logs. Every front-end goes
/// through one of these; nothing is kept in process-wide state.
pub struct Store {
    pub(crate) conn: Connection,
    pub(crate) audit: AuditLog,
}

impl Store {
    /// Open the database named by `config`, creating missing tables. Seeding
    /// is a separate step, see [`Store::seed_defaults`].
    pub fn open(config: &Config) -> Result<Self> {
        let conn = open_database(&config.db_path)?;
        let audit = AuditLog::new(&config.event_log_path, &config.error_log_path);
        Ok(Self::with_connection(conn, audit))
    }

    /// Wrap an already-prepared connection. The schema must exist.
    pub fn with_connection(conn: Connection, audit: AuditLog) -> Self {
        Self { conn, audit }
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Validate and insert a student, then log `Student Added!`.
    pub fn insert_student(&self, draft: &StudentDraft) -> RecordResult<i64> {
        let student = validate::student(draft)?;
        let id = insert_student(&self.conn, &student)
            .map_err(|err| self.storage_failure(Action::AddStudent, err))?;
        tracing::info!(id, name = %student.name, "student added");

        self.record_event(
            Action::AddStudent,
            "Student Added!",
            details([
                ("Name", json!(student.name)),
                ("House", json!(student.house.as_str())),
                ("Year", json!(student.year.to_string())),
            ]),
        )?;
        Ok(id)
    }

    /// Insert a course with no validation, then log `Course Added!`.
    pub fn insert_course(&self, name: &str) -> RecordResult<i64> {
        let id = insert_course(&self.conn, name)
            .map_err(|err| self.storage_failure(Action::AddCourse, err))?;
        tracing::info!(id, name, "course added");

        self.record_event(
            Action::AddCourse,
            "Course Added!",
            details([("Course Name", json!(name))]),
        )?;
        Ok(id)
    }

    /// Insert a staff member with no validation, then log `Teacher Added!`.
    /// `course_id` does not have to name an existing course.
    pub fn insert_admin(&self, name: &str, course_id: i64) -> RecordResult<i64> {
        let id = insert_admin(&self.conn, name, course_id)
            .map_err(|err| self.storage_failure(Action::AddAdmin, err))?;
        tracing::info!(id, name, course_id, "admin added");

        self.record_event(
            Action::AddAdmin,
            "Teacher Added!",
            details([("Name", json!(name)), ("Course ID", json!(course_id))]),
        )?;
        Ok(id)
    }

    pub fn list_students(&self) -> RecordResult<Vec<Student>> {
        fetch_students(&self.conn, None).map_err(|err| self.storage_failure(Action::ListStudents, err))
    }

    pub fn list_students_where(&self, filter: StudentFilter) -> RecordResult<Vec<Student>> {
        let action = match filter {
            StudentFilter::Year(_) => Action::StudentsByYear,
            StudentFilter::House(_) => Action::StudentsByHouse,
        };
        fetch_students(&self.conn, Some(filter)).map_err(|err| self.storage_failure(action, err))
    }

    pub fn list_courses(&self) -> RecordResult<Vec<Course>> {
        fetch_courses(&self.conn).map_err(|err| self.storage_failure(Action::ListCourses, err))
    }

    pub fn list_admins(&self) -> RecordResult<Vec<Admin>> {
        fetch_admins(&self.conn).map_err(|err| self.storage_failure(Action::ListAdmins, err))
    }

    /// First row in `table` whose name matches `name` exactly.
    pub fn find_by_name(&self, table: Table, name: &str) -> RecordResult<Option<Record>> {
        find_by_name(&self.conn, table, name).map_err(|err| self.storage_failure(Action::Delete, err))
    }

    /// Record `source` in the error log and wrap it for the caller.
    pub(crate) fn storage_failure(&self, action: Action, source: rusqlite::Error) -> RecordError {
        tracing::debug!(?action, %source, "storage failure");
        self.audit.report_error(action.log_message(), exception(&source));
        RecordError::Storage { action, source }
    }

    /// Append an event for a committed mutation. If the event log refuses the
    /// entry, the failure is recorded in the error log instead.
    pub(crate) fn record_event(
        &self,
        action: Action,
        event_type: &str,
        event_details: Details,
    ) -> RecordResult<()> {
        self.audit
            .log_event(event_type, event_details)
            .map_err(|source| {
                self.audit.report_error(action.log_message(), exception(&source));
                RecordError::EventLog { action, source }
            })
    }
}

/// The `{"Exception": ...}` detail map used for every error entry.
pub(crate) fn exception(err: &dyn std::error::Error) -> Details {
    details([("Exception", json!(err.to_string()))])
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use super::*;

    /// A store rooted in its own temporary installation directory.
    pub(crate) fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&Config::in_dir(dir.path())).unwrap();
        (dir, store)
    }
}
