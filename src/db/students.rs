use rusqlite::{params, Connection, Row};

use crate::models::{NewStudent, Student, StudentFilter};

/// Insert a validated student and return the `WizardID` SQLite assigned.
pub(crate) fn insert_student(conn: &Connection, student: &NewStudent) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO Students (Name, House, Year) VALUES (?1, ?2, ?3)",
        params![student.name, student.house, student.year],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Students in insertion order, optionally narrowed by an exact year or house.
pub(crate) fn fetch_students(
    conn: &Connection,
    filter: Option<StudentFilter>,
) -> rusqlite::Result<Vec<Student>> {
    const SELECT: &str = "SELECT WizardID, Name, House, Year FROM Students";

    let students = match filter {
        None => {
            let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY WizardID"))?;
            let rows = stmt
                .query_map([], student_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
        Some(StudentFilter::Year(year)) => {
            let mut stmt = conn.prepare(&format!("{SELECT} WHERE Year = ?1 ORDER BY WizardID"))?;
            let rows = stmt
                .query_map(params![year], student_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
        Some(StudentFilter::House(house)) => {
            let mut stmt = conn.prepare(&format!("{SELECT} WHERE House = ?1 ORDER BY WizardID"))?;
            let rows = stmt
                .query_map(params![house], student_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
    };

    Ok(students)
}

pub(crate) fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        house: row.get(2)?,
        year: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::ensure_schema;
    use crate::models::{House, Year};

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    fn add(conn: &Connection, name: &str, house: House, year: u8) -> i64 {
        let student = NewStudent {
            name: name.to_string(),
            house,
            year: Year::new(year).unwrap(),
        };
        insert_student(conn, &student).unwrap()
    }

    #[test]
    fn ids_increase_with_each_insert() {
        let conn = memory_db();
        let first = add(&conn, "Harry Potter", House::Gryffindor, 1);
        let second = add(&conn, "Draco Malfoy", House::Slytherin, 1);
        assert!(second > first);
    }

    #[test]
    fn listing_preserves_insertion_order() {
        let conn = memory_db();
        add(&conn, "Neville Longbottom", House::Gryffindor, 4);
        add(&conn, "Cedric Diggory", House::Hufflepuff, 6);
        add(&conn, "Cho Chang", House::Ravenclaw, 5);

        let names: Vec<_> = fetch_students(&conn, None)
            .unwrap()
            .into_iter()
            .map(|student| student.name)
            .collect();
        assert_eq!(names, ["Neville Longbottom", "Cedric Diggory", "Cho Chang"]);
    }

    #[test]
    fn filters_match_exactly() {
        let conn = memory_db();
        add(&conn, "Luna Lovegood", House::Ravenclaw, 4);
        add(&conn, "Ginny Weasley", House::Gryffindor, 4);
        add(&conn, "Cho Chang", House::Ravenclaw, 5);

        let fourth_years =
            fetch_students(&conn, Some(StudentFilter::Year(Year::new(4).unwrap()))).unwrap();
        assert_eq!(fourth_years.len(), 2);

        let ravenclaws = fetch_students(&conn, Some(StudentFilter::House(House::Ravenclaw))).unwrap();
        let names: Vec<_> = ravenclaws.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Luna Lovegood", "Cho Chang"]);

        let slytherins = fetch_students(&conn, Some(StudentFilter::House(House::Slytherin))).unwrap();
        assert!(slytherins.is_empty());
    }

    #[test]
    fn lowercase_house_rows_do_not_match_the_filter() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO Students (Name, House, Year) VALUES ('Odd', 'ravenclaw', 3)",
            [],
        )
        .unwrap();

        let ravenclaws = fetch_students(&conn, Some(StudentFilter::House(House::Ravenclaw))).unwrap();
        assert!(ravenclaws.is_empty());
    }
}
