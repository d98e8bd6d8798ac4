//! Built-in course and staff lists loaded on first startup.

use rusqlite::{params, Connection};

use crate::error::Action;
use crate::models::Table;

use super::admins::count_admins;
use super::courses::count_courses;
use super::store::{exception, Store};

pub const SEED_COURSES: [&str; 14] = [
    "Astronomy",
    "Charms",
    "Defense Against the Dark Arts",
    "Flying",
    "Herbology",
    "History of Magic",
    "Potions",
    "Transfiguration",
    "Care of Magical Creatures",
    "Divination",
    "Muggle Studies",
    "Study of Ancient Runes",
    "Alchemy",
    "Other Staff",
];

/// Staff name and the id of the course they run.
pub const SEED_ADMINS: [(&str, i64); 12] = [
    ("Albus Dumbledore", 14),
    ("Minerva McGonagall", 8),
    ("Severus Snape", 7),
    ("Filius Flitwick", 2),
    ("Pomona Sprout", 5),
    ("Rubeus Hagrid", 9),
    ("Gilderoy Lockhart", 10),
    ("Horace Slughorn", 11),
    ("Sybill Trelawney", 12),
    ("Remus Lupin", 13),
    ("Alastor Moody", 4),
    ("Firenze", 1),
];

/// A table whose seed could not be loaded. Startup carries on regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFailure {
    pub table: Table,
    pub cause: String,
    action: Action,
}

impl SeedFailure {
    /// Line printed to the user at startup.
    pub fn user_message(&self) -> String {
        self.action.user_message()
    }
}

type Seeder = fn(&Connection) -> rusqlite::Result<bool>;

/// What happened to each seedable table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: Vec<Table>,
    pub failures: Vec<SeedFailure>,
}

impl Store {
    /// Load the built-in courses and staff into whichever of the two tables
    /// is empty. Running it again is a no-op. Failures are written to the
    /// error log and returned in the report; the students table is never
    /// touched.
    pub fn seed_defaults(&self) -> SeedReport {
        let mut report = SeedReport::default();

        let seeders: [(Table, Action, Seeder); 2] = [
            (Table::Courses, Action::SeedCourses, seed_courses),
            (Table::HogwartAdmin, Action::SeedAdmins, seed_admins),
        ];

        for (table, action, seed) in seeders {
            match seed(&self.conn) {
                Ok(true) => {
                    tracing::info!(%table, "seeded default rows");
                    report.seeded.push(table);
                }
                Ok(false) => tracing::debug!(%table, "table already populated"),
                Err(err) => {
                    tracing::warn!(%table, %err, "seeding failed");
                    self.audit.report_error(action.log_message(), exception(&err));
                    report.failures.push(SeedFailure {
                        table,
                        cause: err.to_string(),
                        action,
                    });
                }
            }
        }

        report
    }
}

/// Returns whether rows were inserted. The batch is one transaction, so a
/// failure part way leaves the table empty.
fn seed_courses(conn: &Connection) -> rusqlite::Result<bool> {
    if count_courses(conn)? != 0 {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare("INSERT INTO Courses (CourseName) VALUES (?1)")?;
        for name in SEED_COURSES {
            stmt.execute(params![name])?;
        }
    }
    tx.commit()?;
    Ok(true)
}

fn seed_admins(conn: &Connection) -> rusqlite::Result<bool> {
    if count_admins(conn)? != 0 {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare("INSERT INTO HogwartAdmin (Name, CourseID) VALUES (?1, ?2)")?;
        for (name, course_id) in SEED_ADMINS {
            stmt.execute(params![name, course_id])?;
        }
    }
    tx.commit()?;
    Ok(true)
}
