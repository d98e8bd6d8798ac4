use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::db::{DeleteLookup, DeleteOutcome, PendingDelete, Store};
use crate::models::{StudentDraft, StudentFilter, Table};
use crate::validate;

use super::forms::{DeleteForm, FormKind, RecordForm};
use super::helpers::{
    added_message, admin_line, centered_rect, course_line, delete_outcome_message, student_line,
};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// Entries of the main menu, in display order.
const MENU_ITEMS: [MenuItem; 8] = [
    MenuItem::AddStudent,
    MenuItem::AddTeacher,
    MenuItem::AddCourse,
    MenuItem::ViewStudents,
    MenuItem::ViewProfessors,
    MenuItem::ViewCourses,
    MenuItem::DeleteRecord,
    MenuItem::Exit,
];

#[derive(Copy, Clone, PartialEq, Eq)]
enum MenuItem {
    AddStudent,
    AddTeacher,
    AddCourse,
    ViewStudents,
    ViewProfessors,
    ViewCourses,
    DeleteRecord,
    Exit,
}

impl MenuItem {
    fn label(self) -> &'static str {
        match self {
            MenuItem::AddStudent => "Add Student",
            MenuItem::AddTeacher => "Add Teacher",
            MenuItem::AddCourse => "Add Course",
            MenuItem::ViewStudents => "View Students",
            MenuItem::ViewProfessors => "View Professors",
            MenuItem::ViewCourses => "View Courses",
            MenuItem::DeleteRecord => "Delete Record",
            MenuItem::Exit => "Exit",
        }
    }
}

/// High-level navigation states.
enum Screen {
    Menu,
    /// Rendered rows plus the title describing any active filter.
    Listing {
        table: Table,
        title: String,
        rows: Vec<String>,
        scroll: u16,
    },
}

/// Modal state layered over the current screen.
enum Mode {
    Normal,
    Editing(RecordForm),
    Deleting(DeleteForm),
    ConfirmDelete(PendingDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central state of the form interface.
pub struct App {
    store: Store,
    selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            selected: 0,
            screen: Screen::Menu,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Feed one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Editing(form) => self.handle_form(code, form)?,
            Mode::Deleting(form) => self.handle_delete_form(code, form)?,
            Mode::ConfirmDelete(pending) => self.handle_confirm_delete(code, pending)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let shown = match &self.screen {
            Screen::Menu => None,
            Screen::Listing { table, .. } => Some(*table),
        };

        let Some(table) = shown else {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => *exit = true,
                KeyCode::Up => {
                    self.selected = (self.selected + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
                }
                KeyCode::Down => self.selected = (self.selected + 1) % MENU_ITEMS.len(),
                KeyCode::Enter => return self.activate(MENU_ITEMS[self.selected], exit),
                _ => {}
            }
            return Ok(Mode::Normal);
        };

        let students = table == Table::Students;
        match code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.clear_status();
                self.screen = Screen::Menu;
            }
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.clear_status();
                return Ok(Mode::Deleting(DeleteForm {
                    table,
                    name: String::new(),
                }));
            }
            KeyCode::Char('a') | KeyCode::Char('A') if students => self.show_students(None),
            KeyCode::Char('y') | KeyCode::Char('Y') if students => {
                self.clear_status();
                return Ok(Mode::Editing(RecordForm::new(FormKind::YearFilter)));
            }
            KeyCode::Char('h') | KeyCode::Char('H') if students => {
                self.clear_status();
                return Ok(Mode::Editing(RecordForm::new(FormKind::HouseFilter)));
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn scroll_by(&mut self, step: i16) {
        if let Screen::Listing { scroll, .. } = &mut self.screen {
            *scroll = scroll.saturating_add_signed(step);
        }
    }

    fn activate(&mut self, item: MenuItem, exit: &mut bool) -> Result<Mode> {
        self.clear_status();
        let mode = match item {
            MenuItem::AddStudent => Mode::Editing(RecordForm::new(FormKind::Student)),
            MenuItem::AddTeacher => Mode::Editing(RecordForm::new(FormKind::Teacher)),
            MenuItem::AddCourse => Mode::Editing(RecordForm::new(FormKind::Course)),
            MenuItem::ViewStudents => {
                self.show_students(None);
                Mode::Normal
            }
            MenuItem::ViewProfessors => {
                self.show_table(Table::HogwartAdmin);
                Mode::Normal
            }
            MenuItem::ViewCourses => {
                self.show_table(Table::Courses);
                Mode::Normal
            }
            MenuItem::DeleteRecord => Mode::Deleting(DeleteForm::default()),
            MenuItem::Exit => {
                *exit = true;
                Mode::Normal
            }
        };
        Ok(mode)
    }

    fn handle_form(&mut self, code: KeyCode, mut form: RecordForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status(format!("{} cancelled.", form.kind.title()), StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.submit_form(&form) {
                Ok(()) => return Ok(Mode::Normal),
                Err(message) => {
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Editing(form))
    }

    /// Hand the form to the store. An `Err` carries the message to show while
    /// the form stays open.
    fn submit_form(&mut self, form: &RecordForm) -> std::result::Result<(), String> {
        match form.kind {
            FormKind::Student => {
                let name = form.value(0);
                let draft = StudentDraft::new(name, form.value(2), form.value(1));
                self.store.insert_student(&draft).map_err(|err| err.to_string())?;
                self.after_insert(Table::Students, name);
            }
            FormKind::Teacher => {
                let name = form.value(0);
                let course_id = form
                    .value(1)
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| "Course ID must be a whole number.".to_string())?;
                self.store.insert_admin(name, course_id).map_err(|err| err.to_string())?;
                self.after_insert(Table::HogwartAdmin, name);
            }
            FormKind::Course => {
                let name = form.value(0);
                self.store.insert_course(name).map_err(|err| err.to_string())?;
                self.after_insert(Table::Courses, name);
            }
            FormKind::YearFilter => {
                let year = validate::year(form.value(0)).map_err(|err| err.to_string())?;
                self.show_students(Some(StudentFilter::Year(year)));
            }
            FormKind::HouseFilter => {
                let house = validate::house(form.value(0)).map_err(|err| err.to_string())?;
                self.show_students(Some(StudentFilter::House(house)));
            }
        }
        Ok(())
    }

    fn after_insert(&mut self, table: Table, name: &str) {
        if matches!(&self.screen, Screen::Listing { table: shown, .. } if *shown == table) {
            self.refresh_listing();
        }
        self.set_status(added_message(table, name), StatusKind::Info);
    }

    fn handle_delete_form(&mut self, code: KeyCode, mut form: DeleteForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Left | KeyCode::BackTab => form.cycle_table(-1),
            KeyCode::Right | KeyCode::Tab => form.cycle_table(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(ch) => form.push_char(ch),
            KeyCode::Enter => {
                return match self.store.begin_delete(form.table, &form.name) {
                    Ok(DeleteLookup::Found(pending)) => Ok(Mode::ConfirmDelete(pending)),
                    Ok(DeleteLookup::NotFound { table, name }) => {
                        let outcome = DeleteOutcome::NotFound { table, name };
                        self.set_status(delete_outcome_message(&outcome), StatusKind::Error);
                        Ok(Mode::Deleting(form))
                    }
                    Ok(DeleteLookup::Cancelled(reason)) => {
                        let outcome = DeleteOutcome::Cancelled(reason);
                        self.set_status(delete_outcome_message(&outcome), StatusKind::Info);
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        self.set_status(err.to_string(), StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                };
            }
            _ => {}
        }
        Ok(Mode::Deleting(form))
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, pending: PendingDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                let outcome = pending.decline();
                self.set_status(delete_outcome_message(&outcome), StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.store.confirm_delete(pending) {
                    Ok(outcome) => {
                        self.refresh_listing();
                        self.set_status(delete_outcome_message(&outcome), StatusKind::Info);
                    }
                    Err(err) => self.set_status(err.to_string(), StatusKind::Error),
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(pending)),
        }
    }

    fn show_students(&mut self, filter: Option<StudentFilter>) {
        let (title, result) = match filter {
            None => ("All Students".to_string(), self.store.list_students()),
            Some(StudentFilter::Year(year)) => (
                format!("Students in Year {year}"),
                self.store.list_students_where(StudentFilter::Year(year)),
            ),
            Some(StudentFilter::House(house)) => (
                format!("Students in House {house}"),
                self.store.list_students_where(StudentFilter::House(house)),
            ),
        };

        match result {
            Ok(students) => {
                let rows = students.iter().map(student_line).collect::<Vec<_>>();
                self.screen = Screen::Listing {
                    table: Table::Students,
                    title,
                    rows,
                    scroll: 0,
                };
            }
            Err(err) => self.set_status(err.to_string(), StatusKind::Error),
        }
    }

    fn show_table(&mut self, table: Table) {
        let result = match table {
            Table::Students => return self.show_students(None),
            Table::Courses => self
                .store
                .list_courses()
                .map(|courses| ("All Courses", courses.iter().map(course_line).collect::<Vec<_>>())),
            Table::HogwartAdmin => self
                .store
                .list_admins()
                .map(|admins| ("All Professors", admins.iter().map(admin_line).collect::<Vec<_>>())),
        };

        match result {
            Ok((title, rows)) => {
                self.screen = Screen::Listing {
                    table,
                    title: title.to_string(),
                    rows,
                    scroll: 0,
                };
            }
            Err(err) => self.set_status(err.to_string(), StatusKind::Error),
        }
    }

    /// Reload whatever listing is on screen. Filters are dropped.
    fn refresh_listing(&mut self) {
        if let Screen::Listing { table, .. } = self.screen {
            self.show_table(table);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Menu => self.draw_menu(frame, content_area),
            Screen::Listing {
                title,
                rows,
                scroll,
                ..
            } => self.draw_listing(frame, content_area, title, rows, *scroll),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Editing(form) => self.draw_form(frame, area, form),
            Mode::Deleting(form) => self.draw_delete_form(frame, area, form),
            Mode::ConfirmDelete(pending) => self.draw_confirm_delete(frame, area, pending),
            Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Hogwarts Management")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                if idx == self.selected {
                    Line::from(Span::styled(
                        format!("> {}", item.label()),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {}", item.label()))
                }
            })
            .collect();

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, centered_rect(50, 60, inner));
    }

    fn draw_listing(&self, frame: &mut Frame, area: Rect, title: &str, rows: &[String], scroll: u16) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let lines: Vec<Line> = if rows.is_empty() {
            vec![Line::from(Span::styled(
                "No records found.",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            rows.iter().map(|row| Line::from(row.clone())).collect()
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let hint = match (&self.mode, &self.screen) {
            (Mode::Editing(_), _) => "Enter save • Tab next field • Esc cancel",
            (Mode::Deleting(_), _) => "←/→ table • Enter look up • Esc cancel",
            (Mode::ConfirmDelete(_), _) => "Y delete • N cancel",
            (Mode::Normal, Screen::Menu) => "↑/↓ move • Enter select • q quit",
            (Mode::Normal, Screen::Listing { table: Table::Students, .. }) => {
                "a all • y by year • h by house • d delete • Esc back"
            }
            (Mode::Normal, Screen::Listing { .. }) => "↑/↓ scroll • d delete • Esc back",
        };
        Line::from(Span::styled(hint, Style::default().fg(Color::Gray)))
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &RecordForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(form.kind.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.values.len()).map(|idx| form.build_line(idx)).collect();
        if let Some(hint) = form.kind.hint() {
            lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::Gray))));
        }
        lines.push(Line::from(""));
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        frame.set_cursor_position((
            inner.x + form.cursor_column(),
            inner.y + form.active as u16,
        ));
    }

    fn draw_delete_form(&self, frame: &mut Frame, area: Rect, form: &DeleteForm) {
        let popup_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Record").borders(Borders::ALL);
        let paragraph = Paragraph::new(form.build_lines())
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Name: ".len() as u16 + form.name.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y + 1));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, pending: &PendingDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete '{}' from {}?",
                pending.name(),
                pending.table()
            )),
            Line::from("Every record with this exact name will be removed."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_store;

    fn app() -> (tempfile::TempDir, App) {
        let (dir, store) = temp_store();
        store.seed_defaults();
        (dir, App::new(store))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn status_text(app: &App) -> &str {
        app.status.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }

    #[test]
    fn add_student_form_round_trip() {
        let (_dir, mut app) = app();

        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Editing(ref form) if form.kind == FormKind::Student));

        type_text(&mut app, "Luna Lovegood");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "5");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Ravenclaw");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), "Student Luna Lovegood added successfully!");
        assert_eq!(app.store.list_students().unwrap().len(), 1);
    }

    #[test]
    fn invalid_year_keeps_the_form_open() {
        let (_dir, mut app) = app();

        app.handle_key(KeyCode::Enter).unwrap();
        type_text(&mut app, "X");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "9");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Gryffindor");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::Editing(form) => assert!(form.error.as_deref().unwrap().starts_with("Invalid year")),
            _ => panic!("form should stay open"),
        }
        assert!(app.store.list_students().unwrap().is_empty());
    }

    #[test]
    fn delete_dialog_requires_confirmation() {
        let (_dir, mut app) = app();

        // Move to "Delete Record".
        for _ in 0..6 {
            app.handle_key(KeyCode::Down).unwrap();
        }
        app.handle_key(KeyCode::Enter).unwrap();
        app.handle_key(KeyCode::Right).unwrap();
        type_text(&mut app, "Alchemy");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));

        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(status_text(&app), "Deletion cancelled.");
        assert!(app.store.find_by_name(Table::Courses, "Alchemy").unwrap().is_some());

        app.handle_key(KeyCode::Enter).unwrap();
        app.handle_key(KeyCode::Right).unwrap();
        type_text(&mut app, "Alchemy");
        app.handle_key(KeyCode::Enter).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();

        assert_eq!(status_text(&app), "Course 'Alchemy' deleted successfully!");
        assert!(app.store.find_by_name(Table::Courses, "Alchemy").unwrap().is_none());
    }

    #[test]
    fn professors_listing_shows_seeded_staff() {
        let (_dir, mut app) = app();

        for _ in 0..4 {
            app.handle_key(KeyCode::Down).unwrap();
        }
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.screen {
            Screen::Listing { table, rows, .. } => {
                assert_eq!(*table, Table::HogwartAdmin);
                assert_eq!(rows.len(), 12);
                assert_eq!(rows[0], "WizardID: 1, Name: Albus Dumbledore, CourseID: 14");
            }
            Screen::Menu => panic!("expected a listing"),
        }

        app.handle_key(KeyCode::Esc).unwrap();
        assert!(matches!(app.screen, Screen::Menu));
    }

    #[test]
    fn exit_item_quits() {
        let (_dir, mut app) = app();
        app.handle_key(KeyCode::Up).unwrap();
        assert!(app.handle_key(KeyCode::Enter).unwrap());
    }
}
