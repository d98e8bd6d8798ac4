//! Append-only JSON audit logs.
//!
//! Each log is one file holding a single JSON array. Appending reads the whole
//! array, pushes the new entry, and rewrites the file. The event log insists on
//! a well-formed array and loses the entry otherwise; the error log starts over
//! from an empty array so the new error is always kept.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::error::AuditError;

/// Named detail values attached to an entry. Keys keep insertion order.
pub type Details = Map<String, Value>;

/// Build a [`Details`] map from literal pairs.
pub fn details<const N: usize>(pairs: [(&str, Value); N]) -> Details {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Event_Type")]
    pub event_type: String,
    #[serde(rename = "Details")]
    pub details: Details,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Error_Message")]
    pub error_message: String,
    #[serde(rename = "Details")]
    pub details: Details,
}

/// What to do when the existing file is not a JSON array.
#[derive(Clone, Copy)]
enum OnCorrupt {
    Fail,
    StartOver,
}

/// Handle on the event log and error log files.
#[derive(Debug, Clone)]
pub struct AuditLog {
    event_path: PathBuf,
    error_path: PathBuf,
}

impl AuditLog {
    pub fn new(event_path: impl Into<PathBuf>, error_path: impl Into<PathBuf>) -> Self {
        Self {
            event_path: event_path.into(),
            error_path: error_path.into(),
        }
    }

    pub fn event_path(&self) -> &Path {
        &self.event_path
    }

    pub fn error_path(&self) -> &Path {
        &self.error_path
    }

    /// Append an event. Fails with [`AuditError::Corrupt`] when the existing
    /// file cannot be parsed; the file is left untouched in that case.
    pub fn log_event(&self, event_type: &str, details: Details) -> Result<(), AuditError> {
        let entry = EventEntry {
            timestamp: timestamp(),
            event_type: event_type.to_string(),
            details,
        };
        append(&self.event_path, &entry, OnCorrupt::Fail)
    }

    /// Append an error entry. Unparseable existing content is discarded and
    /// replaced by a one-element array.
    pub fn log_error(&self, message: &str, details: Details) -> Result<(), AuditError> {
        let entry = ErrorEntry {
            timestamp: timestamp(),
            error_message: message.to_string(),
            details,
        };
        append(&self.error_path, &entry, OnCorrupt::StartOver)
    }

    /// Like [`AuditLog::log_error`], but a failure to write the error log is
    /// only traced. Used on paths that are already reporting a failure.
    pub fn report_error(&self, message: &str, details: Details) {
        if let Err(err) = self.log_error(message, details) {
            tracing::error!(%err, error_message = message, "failed to log error");
        }
    }

    /// Every event written so far. A missing file reads as empty.
    pub fn events(&self) -> Result<Vec<EventEntry>, AuditError> {
        read_entries(&self.event_path)
    }

    /// Every error written so far. A missing file reads as empty.
    pub fn errors(&self) -> Result<Vec<ErrorEntry>, AuditError> {
        read_entries(&self.error_path)
    }
}

/// Local time in ISO-8601 with microseconds and no offset.
fn timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn append<T: Serialize>(path: &Path, entry: &T, on_corrupt: OnCorrupt) -> Result<(), AuditError> {
    let entry = serde_json::to_value(entry).map_err(AuditError::Encode)?;

    let mut entries = match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<Vec<Value>>(&contents) {
            Ok(entries) => entries,
            Err(source) => match on_corrupt {
                OnCorrupt::Fail => {
                    return Err(AuditError::Corrupt {
                        path: path.to_path_buf(),
                        source,
                    })
                }
                OnCorrupt::StartOver => {
                    tracing::warn!(path = %path.display(), %source, "discarding unreadable log");
                    Vec::new()
                }
            },
        },
        Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
        Err(source) => {
            return Err(AuditError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    entries.push(entry);
    write_pretty(path, &entries)
}

fn write_pretty(path: &Path, entries: &[Value]) -> Result<(), AuditError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    entries
        .serialize(&mut serializer)
        .map_err(AuditError::Encode)?;

    fs::write(path, buf).map_err(|source| AuditError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_entries<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, AuditError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(AuditError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents).map_err(|source| AuditError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn audit_in(dir: &TempDir) -> AuditLog {
        AuditLog::new(dir.path().join("events.json"), dir.path().join("errors.json"))
    }

    #[test]
    fn first_event_creates_single_element_array() {
        let dir = TempDir::new().unwrap();
        let audit = audit_in(&dir);

        audit
            .log_event("Course Added!", details([("Course Name", json!("Alchemy"))]))
            .unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(audit.event_path()).unwrap()).unwrap();
        let entries = raw.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["Event_Type"], "Course Added!");
        assert_eq!(entries[0]["Details"]["Course Name"], "Alchemy");
        assert!(entries[0]["Timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn events_append_in_call_order() {
        let dir = TempDir::new().unwrap();
        let audit = audit_in(&dir);

        for name in ["Astronomy", "Charms", "Flying"] {
            audit
                .log_event("Course Added!", details([("Course Name", json!(name))]))
                .unwrap();
        }

        let names: Vec<_> = audit
            .events()
            .unwrap()
            .into_iter()
            .map(|entry| entry.details["Course Name"].clone())
            .collect();
        assert_eq!(names, vec![json!("Astronomy"), json!("Charms"), json!("Flying")]);
    }

    #[test]
    fn details_keep_insertion_order_on_disk() {
        let dir = TempDir::new().unwrap();
        let audit = audit_in(&dir);

        audit
            .log_event(
                "Student Added!",
                details([
                    ("Name", json!("Luna Lovegood")),
                    ("House", json!("Ravenclaw")),
                    ("Year", json!("5")),
                ]),
            )
            .unwrap();

        let text = fs::read_to_string(audit.event_path()).unwrap();
        let name_at = text.find("\"Name\"").unwrap();
        let house_at = text.find("\"House\"").unwrap();
        let year_at = text.find("\"Year\"").unwrap();
        assert!(name_at < house_at && house_at < year_at);
        assert!(text.contains("\n    {"), "expected four-space indentation");
    }

    #[test]
    fn corrupt_event_log_rejects_append_and_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let audit = audit_in(&dir);
        fs::write(audit.event_path(), "{not json").unwrap();

        let err = audit
            .log_event("Course Added!", details([("Course Name", json!("Flying"))]))
            .unwrap_err();

        assert!(matches!(err, AuditError::Corrupt { .. }));
        assert_eq!(fs::read_to_string(audit.event_path()).unwrap(), "{not json");
    }

    #[test]
    fn corrupt_error_log_is_replaced_by_the_new_entry() {
        let dir = TempDir::new().unwrap();
        let audit = audit_in(&dir);
        fs::write(audit.error_path(), "][ garbage that is quite long").unwrap();

        audit
            .log_error("Failed to remove data", details([("Exception", json!("disk full"))]))
            .unwrap();

        let errors = audit.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_message, "Failed to remove data");
        assert_eq!(errors[0].details["Exception"], "disk full");
    }

    #[test]
    fn error_log_accepts_empty_details() {
        let dir = TempDir::new().unwrap();
        let audit = audit_in(&dir);

        audit.log_error("Failed to access admin list", Details::new()).unwrap();
        audit.log_error("Failed to access course list", Details::new()).unwrap();

        let errors = audit.errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].details.is_empty());
    }

    #[test]
    fn missing_logs_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let audit = audit_in(&dir);
        assert!(audit.events().unwrap().is_empty());
        assert!(audit.errors().unwrap().is_empty());
    }
}
