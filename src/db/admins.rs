use rusqlite::{params, Connection, Row};

use crate::models::Admin;

/// Insert a staff member. `course_id` is stored as-is; it is never checked
/// against the Courses table.
pub(crate) fn insert_admin(conn: &Connection, name: &str, course_id: i64) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO HogwartAdmin (Name, CourseID) VALUES (?1, ?2)",
        params![name, course_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn fetch_admins(conn: &Connection) -> rusqlite::Result<Vec<Admin>> {
    let mut stmt = conn.prepare("SELECT WizardID, Name, CourseID FROM HogwartAdmin ORDER BY WizardID")?;
    let admins = stmt
        .query_map([], admin_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(admins)
}

pub(crate) fn count_admins(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM HogwartAdmin", [], |row| row.get(0))
}

pub(crate) fn admin_from_row(row: &Row<'_>) -> rusqlite::Result<Admin> {
    Ok(Admin {
        id: row.get(0)?,
        name: row.get(1)?,
        course_id: row.get(2)?,
    })
}
