use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Record, Table};

use super::admins::admin_from_row;
use super::courses::course_from_row;
use super::students::student_from_row;

/// First row (lowest id) whose name column equals `name` exactly.
pub(crate) fn find_by_name(
    conn: &Connection,
    table: Table,
    name: &str,
) -> rusqlite::Result<Option<Record>> {
    let sql = match table {
        Table::Students => {
            "SELECT WizardID, Name, House, Year FROM Students WHERE Name = ?1 ORDER BY WizardID LIMIT 1"
        }
        Table::Courses => {
            "SELECT CourseID, CourseName FROM Courses WHERE CourseName = ?1 ORDER BY CourseID LIMIT 1"
        }
        Table::HogwartAdmin => {
            "SELECT WizardID, Name, CourseID FROM HogwartAdmin WHERE Name = ?1 ORDER BY WizardID LIMIT 1"
        }
    };

    conn.query_row(sql, params![name], |row| match table {
        Table::Students => student_from_row(row).map(Record::Student),
        Table::Courses => course_from_row(row).map(Record::Course),
        Table::HogwartAdmin => admin_from_row(row).map(Record::Admin),
    })
    .optional()
}

/// Remove every row whose name equals `name`. Duplicates all go at once.
pub(crate) fn delete_by_name(conn: &Connection, table: Table, name: &str) -> rusqlite::Result<usize> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?1",
        table.sql_name(),
        table.name_column()
    );
    conn.execute(&sql, params![name])
}
