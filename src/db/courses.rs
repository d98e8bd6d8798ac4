use rusqlite::{params, Connection, Row};

use crate::models::Course;

/// Insert a course. No checks: blank and duplicate names are stored as given.
pub(crate) fn insert_course(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
    conn.execute("INSERT INTO Courses (CourseName) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn fetch_courses(conn: &Connection) -> rusqlite::Result<Vec<Course>> {
    let mut stmt = conn.prepare("SELECT CourseID, CourseName FROM Courses ORDER BY CourseID")?;
    let courses = stmt
        .query_map([], course_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(courses)
}

pub(crate) fn count_courses(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM Courses", [], |row| row.get(0))
}

pub(crate) fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
