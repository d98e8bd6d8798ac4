use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Open (or create) the SQLite file at `path` and make sure all three tables
/// exist. Creation is idempotent and never touches existing rows.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create any missing table. Safe to call on every startup.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS HogwartAdmin (
            WizardID INTEGER PRIMARY KEY AUTOINCREMENT,
            Name TEXT NOT NULL,
            CourseID INT
        )",
        [],
    )
    .context("failed to create HogwartAdmin table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Courses (
            CourseID INTEGER PRIMARY KEY AUTOINCREMENT,
            CourseName TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create Courses table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Students (
            WizardID INTEGER PRIMARY KEY AUTOINCREMENT,
            Name TEXT NOT NULL,
            House TEXT NOT NULL,
            Year INTEGER NOT NULL
        )",
        [],
    )
    .context("failed to create Students table")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap();
        names
    }

    #[test]
    fn creates_all_three_tables() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        assert_eq!(table_names(&conn), vec!["Courses", "HogwartAdmin", "Students"]);
    }

    #[test]
    fn schema_creation_keeps_existing_rows() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute("INSERT INTO Courses (CourseName) VALUES ('Potions')", [])
            .unwrap();

        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Courses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn open_database_creates_missing_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("Hogwarts.db");

        open_database(&path).unwrap();

        assert!(path.exists());
    }
}
