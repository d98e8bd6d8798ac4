//! Line-oriented menu front-end. Reads answers from any `BufRead` and writes
//! prompts to any `Write`, so the same loop serves stdin and scripted tests.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::db::{DeleteLookup, DeleteOutcome, Store};
use crate::models::{House, StudentDraft, StudentFilter, Table};
use crate::validate;

use super::helpers::{added_message, admin_line, course_line, delete_outcome_message, student_line};

const MAIN_MENU: &str = "\
Student/Teacher Management System
1. Add a Student
2. Add a Teacher
3. Add a Course
4. View all Students
5. View all Admins
6. View all Courses
7. Delete a Record
8. Exit";

const STUDENT_MENU: &str = "\
1. View all students
2. View students by year
3. View students by house
4. Exit";

const DELETE_MENU: &str = "\
Which table would you like to delete from?
1. Students
2. Courses
3. HogwartAdmin";

pub struct Menu<'a, R, W> {
    store: &'a Store,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a Store, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    /// Give back the output sink, mostly so tests can inspect it.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user picks Exit or input runs out.
    pub fn run(&mut self) -> Result<()> {
        self.say("\nHogwarts School of Witchcraft and Wizardry")?;
        self.say("Welcome to the Student/Teacher Management System")?;
        self.say("=========================================")?;
        self.say(MAIN_MENU)?;

        loop {
            let Some(choice) = self.ask("Enter your choice (1-8): ")? else {
                break;
            };
            match choice.trim() {
                "1" => self.add_student()?,
                "2" => self.add_teacher()?,
                "3" => self.add_course()?,
                "4" => self.student_listing()?,
                "5" => self.list_admins()?,
                "6" => self.list_courses()?,
                "7" => self.delete_record()?,
                "8" => {
                    self.say("Exiting the program.")?;
                    break;
                }
                _ => {
                    self.say("Invalid choice. Please try again.")?;
                    self.say(MAIN_MENU)?;
                }
            }
        }
        Ok(())
    }

    fn add_student(&mut self) -> Result<()> {
        let Some(name) = self.ask("Enter the student's name: ")? else {
            return Ok(());
        };
        let Some(year) = self.ask("Enter the student's year (1-7): ")? else {
            return Ok(());
        };
        let houses = House::ALL.map(House::as_str).join(", ");
        let Some(house) = self.ask(&format!("Enter the student's house ({houses}): "))? else {
            return Ok(());
        };

        match self.store.insert_student(&StudentDraft::new(&name, house, year)) {
            Ok(_) => self.say(&added_message(Table::Students, &name)),
            Err(err) => self.say(&err.to_string()),
        }
    }

    fn add_teacher(&mut self) -> Result<()> {
        let Some(name) = self.ask("Enter the admin's name: ")? else {
            return Ok(());
        };
        let Some(raw_course) = self.ask("Enter the course/occupation ID: ")? else {
            return Ok(());
        };
        let Ok(course_id) = raw_course.trim().parse::<i64>() else {
            return self.say("Invalid course ID. Please enter a whole number.");
        };

        match self.store.insert_admin(&name, course_id) {
            Ok(_) => self.say(&added_message(Table::HogwartAdmin, &name)),
            Err(err) => self.say(&err.to_string()),
        }
    }

    fn add_course(&mut self) -> Result<()> {
        let Some(name) = self.ask("Enter the course name: ")? else {
            return Ok(());
        };
        match self.store.insert_course(&name) {
            Ok(_) => self.say(&added_message(Table::Courses, &name)),
            Err(err) => self.say(&err.to_string()),
        }
    }

    fn student_listing(&mut self) -> Result<()> {
        loop {
            self.say(STUDENT_MENU)?;
            let Some(choice) = self.ask("Enter your choice (1-4): ")? else {
                return Ok(());
            };
            match choice.trim() {
                "1" => match self.store.list_students() {
                    Ok(students) if students.is_empty() => self.say("No students found.")?,
                    Ok(students) => {
                        self.say("List of all students:")?;
                        for student in &students {
                            self.say(&student_line(student))?;
                        }
                    }
                    Err(err) => self.say(&err.to_string())?,
                },
                "2" => self.students_by_year()?,
                "3" => self.students_by_house()?,
                "4" => {
                    self.say("Exiting student list.")?;
                    return Ok(());
                }
                _ => self.say("Invalid choice. Please try again.")?,
            }
        }
    }

    fn students_by_year(&mut self) -> Result<()> {
        let Some(raw) = self.ask("Enter the year (1-7): ")? else {
            return Ok(());
        };
        let year = match validate::year(&raw) {
            Ok(year) => year,
            Err(err) => return self.say(&err.to_string()),
        };

        match self.store.list_students_where(StudentFilter::Year(year)) {
            Ok(students) if students.is_empty() => {
                self.say(&format!("No students found in Year {year}."))
            }
            Ok(students) => {
                self.say(&format!("Students in Year {year}:"))?;
                for student in &students {
                    self.say(&student_line(student))?;
                }
                Ok(())
            }
            Err(err) => self.say(&err.to_string()),
        }
    }

    fn students_by_house(&mut self) -> Result<()> {
        let Some(raw) = self.ask("Enter the house name: ")? else {
            return Ok(());
        };
        let house = match validate::house(&raw) {
            Ok(house) => house,
            Err(_) => return self.say("No students found in that house."),
        };

        match self.store.list_students_where(StudentFilter::House(house)) {
            Ok(students) if students.is_empty() => self.say("No students found in that house."),
            Ok(students) => {
                self.say(&format!("Students in House {house}:"))?;
                for student in &students {
                    self.say(&student_line(student))?;
                }
                Ok(())
            }
            Err(err) => self.say(&err.to_string()),
        }
    }

    fn list_admins(&mut self) -> Result<()> {
        match self.store.list_admins() {
            Ok(admins) if admins.is_empty() => self.say("No admins found."),
            Ok(admins) => {
                self.say("List of all admins:")?;
                for admin in &admins {
                    self.say(&admin_line(admin))?;
                }
                Ok(())
            }
            Err(err) => self.say(&err.to_string()),
        }
    }

    fn list_courses(&mut self) -> Result<()> {
        match self.store.list_courses() {
            Ok(courses) if courses.is_empty() => self.say("No courses found."),
            Ok(courses) => {
                self.say("List of all courses:")?;
                for course in &courses {
                    self.say(&course_line(course))?;
                }
                Ok(())
            }
            Err(err) => self.say(&err.to_string()),
        }
    }

    fn delete_record(&mut self) -> Result<()> {
        self.say(DELETE_MENU)?;
        let Some(choice) = self.ask("Enter the number corresponding to the table: ")? else {
            return Ok(());
        };
        let table = match choice.trim() {
            "1" => Table::Students,
            "2" => Table::Courses,
            "3" => Table::HogwartAdmin,
            _ => return self.say("Invalid choice. No records deleted."),
        };

        let Some(name) = self.ask(&format!("Enter the {} name you want to delete: ", table.noun()))? else {
            return Ok(());
        };

        let pending = match self.store.begin_delete(table, &name) {
            Ok(DeleteLookup::Found(pending)) => pending,
            Ok(DeleteLookup::NotFound { table, name }) => {
                let outcome = DeleteOutcome::NotFound { table, name };
                return self.say(&delete_outcome_message(&outcome));
            }
            Ok(DeleteLookup::Cancelled(reason)) => {
                let outcome = DeleteOutcome::Cancelled(reason);
                return self.say(&delete_outcome_message(&outcome));
            }
            Err(err) => return self.say(&err.to_string()),
        };

        let answer = self.ask(&pending.prompt())?.unwrap_or_default();
        let outcome = if answer.trim().eq_ignore_ascii_case("y") {
            match self.store.confirm_delete(pending) {
                Ok(outcome) => outcome,
                Err(err) => return self.say(&err.to_string()),
            }
        } else {
            pending.decline()
        };
        self.say(&delete_outcome_message(&outcome))
    }

    /// Print `prompt` and read one line. `None` means input is exhausted.
    /// Only the line ending is stripped; validation sees everything else.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").context("failed to write output")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::db::test_support::temp_store;

    fn run_script(store: &Store, script: &str) -> String {
        let mut menu = Menu::new(store, Cursor::new(script.as_bytes().to_vec()), Vec::new());
        menu.run().unwrap();
        String::from_utf8(menu.into_output()).unwrap()
    }

    #[test]
    fn adds_and_lists_a_student() {
        let (_dir, store) = temp_store();

        let output = run_script(&store, "1\nLuna Lovegood\n5\nRavenclaw\n4\n1\n4\n8\n");

        assert!(output.contains("Student Luna Lovegood added successfully!"));
        assert!(output.contains("Name: Luna Lovegood, House: Ravenclaw, Year: 5"));
        assert!(output.contains("Exiting the program."));
    }

    #[test]
    fn invalid_year_is_reported_and_not_stored() {
        let (_dir, store) = temp_store();

        let output = run_script(&store, "1\nX\n9\nGryffindor\n8\n");

        assert!(output.contains("Invalid year"));
        assert!(store.list_students().unwrap().is_empty());
        assert!(store.audit().events().unwrap().is_empty());
    }

    #[test]
    fn invalid_choices_loop_without_recursing() {
        let (_dir, store) = temp_store();
        let script = "nope\n".repeat(5_000) + "8\n";

        let output = run_script(&store, &script);

        assert_eq!(output.matches("Invalid choice. Please try again.").count(), 5_000);
    }

    #[test]
    fn delete_asks_before_removing() {
        let (_dir, store) = temp_store();
        store.seed_defaults();

        let output = run_script(&store, "7\n2\nAlchemy\nn\n7\n2\n  Alchemy  \ny\n8\n");

        assert!(output.contains("Are you sure you want to delete course 'Alchemy'? (Y/N): "));
        assert!(output.contains("Deletion cancelled."));
        assert!(output.contains("Course 'Alchemy' deleted successfully!"));
        assert!(store.find_by_name(Table::Courses, "Alchemy").unwrap().is_none());

        let events = store.audit().events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "Course Deleted!");
    }

    #[test]
    fn delete_reports_missing_and_blank_names() {
        let (_dir, store) = temp_store();

        let output = run_script(&store, "7\n1\nTom Riddle\n7\n3\n   \n7\n9\n8\n");

        assert!(output.contains("No student found with the name 'Tom Riddle'."));
        assert!(output.contains("No name entered. Deletion cancelled."));
        assert!(output.contains("Invalid choice. No records deleted."));
        assert!(store.audit().events().unwrap().is_empty());
    }

    #[test]
    fn teacher_course_id_must_be_numeric() {
        let (_dir, store) = temp_store();

        let output = run_script(&store, "2\nRemus Lupin\nthirteen\n2\nRemus Lupin\n13\n5\n8\n");

        assert!(output.contains("Invalid course ID."));
        assert!(output.contains("Admin Remus Lupin added successfully!"));
        assert!(output.contains("WizardID: 1, Name: Remus Lupin, CourseID: 13"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let (_dir, store) = temp_store();
        let output = run_script(&store, "1\nHalf");
        assert!(!output.contains("added successfully"));
    }
}
