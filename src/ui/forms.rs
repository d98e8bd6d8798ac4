use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{House, Table};

/// Which record form is open. Each kind has a fixed list of text fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormKind {
    Student,
    Teacher,
    Course,
    YearFilter,
    HouseFilter,
}

impl FormKind {
    pub(crate) fn title(self) -> &'static str {
        match self {
            FormKind::Student => "Add Student",
            FormKind::Teacher => "Add Teacher",
            FormKind::Course => "Add Course",
            FormKind::YearFilter => "Students by Year",
            FormKind::HouseFilter => "Students by House",
        }
    }

    pub(crate) fn labels(self) -> &'static [&'static str] {
        match self {
            FormKind::Student => &["Name", "Year (1-7)", "House"],
            FormKind::Teacher => &["Name", "Course ID"],
            FormKind::Course => &["Course Name"],
            FormKind::YearFilter => &["Year (1-7)"],
            FormKind::HouseFilter => &["House"],
        }
    }

    /// Extra line shown under the fields.
    pub(crate) fn hint(self) -> Option<String> {
        match self {
            FormKind::Student | FormKind::HouseFilter => Some(format!(
                "Houses: {}",
                House::ALL.map(House::as_str).join(", ")
            )),
            _ => None,
        }
    }
}

/// Text-entry state for one of the add/filter forms. Values are kept exactly
/// as typed; the store decides what is acceptable.
#[derive(Clone, Debug)]
pub(crate) struct RecordForm {
    pub(crate) kind: FormKind,
    pub(crate) values: Vec<String>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl RecordForm {
    pub(crate) fn new(kind: FormKind) -> Self {
        Self {
            kind,
            values: vec![String::new(); kind.labels().len()],
            active: 0,
            error: None,
        }
    }

    pub(crate) fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub(crate) fn next_field(&mut self) {
        self.active = (self.active + 1) % self.values.len();
    }

    pub(crate) fn prev_field(&mut self) {
        self.active = (self.active + self.values.len() - 1) % self.values.len();
    }

    /// Append a character to the active field. Control characters are
    /// ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.values[self.active].push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.values[self.active].pop();
    }

    /// Render one field as `Label: value`, highlighting the active one.
    pub(crate) fn build_line(&self, index: usize) -> Line<'static> {
        let label = self.kind.labels()[index];
        let value = self.value(index);
        let is_active = index == self.active;

        let display = if value.is_empty() {
            "<empty>".to_string()
        } else {
            value.to_string()
        };
        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(display, style),
        ])
    }

    /// Column offset of the cursor within the active line.
    pub(crate) fn cursor_column(&self) -> u16 {
        let label = self.kind.labels()[self.active];
        (label.len() + 2 + self.value(self.active).chars().count()) as u16
    }
}

/// Delete dialog: pick a table, type a name.
#[derive(Clone, Debug)]
pub(crate) struct DeleteForm {
    pub(crate) table: Table,
    pub(crate) name: String,
}

impl Default for DeleteForm {
    fn default() -> Self {
        Self {
            table: Table::Students,
            name: String::new(),
        }
    }
}

impl DeleteForm {
    /// Move the table selector forwards or backwards, wrapping around.
    pub(crate) fn cycle_table(&mut self, step: isize) {
        let tables = Table::ALL;
        let current = tables
            .iter()
            .position(|table| *table == self.table)
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(tables.len() as isize) as usize;
        self.table = tables[next];
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.name.push(ch);
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        let mut table_spans = vec![Span::raw("Table: ")];
        for table in Table::ALL {
            let style = if table == self.table {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            table_spans.push(Span::styled(format!("[{}] ", table.sql_name()), style));
        }

        vec![
            Line::from(table_spans),
            Line::from(vec![
                Span::raw("Name: "),
                Span::styled(self.name.clone(), Style::default().fg(Color::Yellow)),
            ]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_wrap_in_both_directions() {
        let mut form = RecordForm::new(FormKind::Student);
        form.prev_field();
        assert_eq!(form.active, 2);
        form.next_field();
        assert_eq!(form.active, 0);
    }

    #[test]
    fn typing_goes_to_the_active_field() {
        let mut form = RecordForm::new(FormKind::Teacher);
        for ch in "Remus".chars() {
            form.push_char(ch);
        }
        form.next_field();
        assert!(!form.push_char('\u{7}'));
        form.push_char('1');
        form.push_char('3');
        form.backspace();

        assert_eq!(form.value(0), "Remus");
        assert_eq!(form.value(1), "1");
        assert_eq!(form.cursor_column(), "Course ID: 1".len() as u16);
    }

    #[test]
    fn delete_table_selector_cycles() {
        let mut form = DeleteForm::default();
        form.cycle_table(-1);
        assert_eq!(form.table, Table::HogwartAdmin);
        form.cycle_table(1);
        form.cycle_table(1);
        assert_eq!(form.table, Table::Courses);
    }
}
