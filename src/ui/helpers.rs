//! Text shared by both front-ends so the menu and the form interface word
//! every result the same way.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::db::{Cancellation, DeleteOutcome};
use crate::models::{Admin, Course, Student, Table};

pub(crate) fn student_line(student: &Student) -> String {
    format!(
        "Name: {}, House: {}, Year: {}",
        student.name, student.house, student.year
    )
}

pub(crate) fn admin_line(admin: &Admin) -> String {
    let course = admin
        .course_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "None".to_string());
    format!("WizardID: {}, Name: {}, CourseID: {}", admin.id, admin.name, course)
}

pub(crate) fn course_line(course: &Course) -> String {
    format!("CourseID: {}, CourseName: {}", course.id, course.name)
}

/// Message for a finished delete request.
pub(crate) fn delete_outcome_message(outcome: &DeleteOutcome) -> String {
    match outcome {
        DeleteOutcome::Deleted { table, name, count } => {
            let noun = capitalize(table.noun());
            if *count > 1 {
                format!("{count} {noun} records named '{name}' deleted successfully!")
            } else {
                format!("{noun} '{name}' deleted successfully!")
            }
        }
        DeleteOutcome::NotFound { table, name } => {
            format!("No {} found with the name '{name}'.", table.noun())
        }
        DeleteOutcome::Cancelled(Cancellation::EmptyName) => {
            "No name entered. Deletion cancelled.".to_string()
        }
        DeleteOutcome::Cancelled(Cancellation::Declined) => "Deletion cancelled.".to_string(),
    }
}

/// Confirmation shown after a successful insert.
pub(crate) fn added_message(table: Table, name: &str) -> String {
    match table {
        Table::Students => format!("Student {name} added successfully!"),
        Table::Courses => format!("Course {name} added successfully!"),
        Table::HogwartAdmin => format!("Admin {name} added successfully!"),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{House, Year};

    #[test]
    fn row_lines_match_the_listing_format() {
        let student = Student {
            id: 3,
            name: "Luna Lovegood".into(),
            house: House::Ravenclaw,
            year: Year::new(5).unwrap(),
        };
        assert_eq!(
            student_line(&student),
            "Name: Luna Lovegood, House: Ravenclaw, Year: 5"
        );

        let admin = Admin {
            id: 1,
            name: "Firenze".into(),
            course_id: None,
        };
        assert_eq!(admin_line(&admin), "WizardID: 1, Name: Firenze, CourseID: None");
    }

    #[test]
    fn delete_messages_name_the_table() {
        let deleted = DeleteOutcome::Deleted {
            table: Table::Courses,
            name: "Alchemy".into(),
            count: 1,
        };
        assert_eq!(delete_outcome_message(&deleted), "Course 'Alchemy' deleted successfully!");

        let missing = DeleteOutcome::NotFound {
            table: Table::HogwartAdmin,
            name: "Voldemort".into(),
        };
        assert_eq!(
            delete_outcome_message(&missing),
            "No admin found with the name 'Voldemort'."
        );
    }
}
