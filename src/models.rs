//! Domain models that mirror the SQLite schema and get passed between the
//! store and both front-ends. The row types stay light-weight data holders; the
//! closed enumerations (`House`, `Table`) and the checked `Year` newtype are
//! what keep invalid values from reaching the persistence layer.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

/// The four houses a student can be sorted into. Matching is case-exact, so
/// "gryffindor" is not a house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum House {
    Gryffindor,
    Slytherin,
    Hufflepuff,
    Ravenclaw,
}

impl House {
    pub const ALL: [House; 4] = [
        House::Gryffindor,
        House::Slytherin,
        House::Hufflepuff,
        House::Ravenclaw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            House::Gryffindor => "Gryffindor",
            House::Slytherin => "Slytherin",
            House::Hufflepuff => "Hufflepuff",
            House::Ravenclaw => "Ravenclaw",
        }
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for House {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        House::ALL
            .into_iter()
            .find(|house| house.as_str() == raw)
            .ok_or(())
    }
}

impl ToSql for House {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for House {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        raw.parse()
            .map_err(|_| FromSqlError::Other(format!("unknown house {raw:?}").into()))
    }
}

/// School year, always within 1..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(u8);

impl Year {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 7;

    /// Returns `None` for anything outside the seven school years.
    pub fn new(value: u8) -> Option<Self> {
        (Self::FIRST..=Self::LAST).contains(&value).then_some(Year(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Year {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.0)))
    }
}

impl FromSql for Year {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_i64()?;
        u8::try_from(raw)
            .ok()
            .and_then(Year::new)
            .ok_or(FromSqlError::OutOfRange(raw))
    }
}

/// The three record tables. Doubles as the selector for delete requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Students,
    Courses,
    HogwartAdmin,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Students, Table::Courses, Table::HogwartAdmin];

    /// Name of the backing SQLite table.
    pub fn sql_name(self) -> &'static str {
        match self {
            Table::Students => "Students",
            Table::Courses => "Courses",
            Table::HogwartAdmin => "HogwartAdmin",
        }
    }

    /// Column matched by delete-by-name.
    pub(crate) fn name_column(self) -> &'static str {
        match self {
            Table::Students | Table::HogwartAdmin => "Name",
            Table::Courses => "CourseName",
        }
    }

    /// Singular noun used in prompts ("student", "course", "admin").
    pub fn noun(self) -> &'static str {
        match self {
            Table::Students => "student",
            Table::Courses => "course",
            Table::HogwartAdmin => "admin",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// `WizardID` primary key, assigned by SQLite.
    pub id: i64,
    pub name: String,
    pub house: House,
    pub year: Year,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Staff member. `course_id` points at a course by convention only; nothing
/// checks that the course exists.
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub course_id: Option<i64>,
}

/// A row from any of the three tables, as returned by name lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Student(Student),
    Course(Course),
    Admin(Admin),
}

impl Record {
    pub fn id(&self) -> i64 {
        match self {
            Record::Student(student) => student.id,
            Record::Course(course) => course.id,
            Record::Admin(admin) => admin.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Record::Student(student) => &student.name,
            Record::Course(course) => &course.name,
            Record::Admin(admin) => &admin.name,
        }
    }
}

/// Raw student fields exactly as a front-end collected them. Nothing here is
/// trusted until the validator has turned it into a [`NewStudent`].
#[derive(Debug, Clone, Default)]
pub struct StudentDraft {
    pub name: String,
    pub house: String,
    pub year: String,
}

impl StudentDraft {
    pub fn new(name: impl Into<String>, house: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            house: house.into(),
            year: year.into(),
        }
    }
}

/// Validated student fields, ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub house: House,
    pub year: Year,
}

/// The two supported student listing predicates. Both are exact matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentFilter {
    Year(Year),
    House(House),
}
