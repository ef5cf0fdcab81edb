use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use reminders_tui::{Priority, Reminder, ReminderDraft};

use super::form::{hints, popup, render_field};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReminderField {
    Title,
    Notes,
    DueDate,
    DueTime,
    Priority,
}

impl ReminderField {
    pub fn next(self) -> Self {
        match self {
            ReminderField::Title => ReminderField::Notes,
            ReminderField::Notes => ReminderField::DueDate,
            ReminderField::DueDate => ReminderField::DueTime,
            ReminderField::DueTime => ReminderField::Priority,
            ReminderField::Priority => ReminderField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ReminderField::Title => ReminderField::Priority,
            ReminderField::Notes => ReminderField::Title,
            ReminderField::DueDate => ReminderField::Notes,
            ReminderField::DueTime => ReminderField::DueDate,
            ReminderField::Priority => ReminderField::DueTime,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReminderFormState {
    pub title: String,
    pub notes: String,
    /// Empty means no due date.
    pub due_date: String,
    pub due_time: String,
    pub priority: Priority,
    pub active_field: ReminderField,
    pub editing: Option<Reminder>,
}

impl ReminderFormState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            title: String::new(),
            notes: String::new(),
            due_date: date.format("%Y-%m-%d").to_string(),
            due_time: "09:00".to_string(),
            priority: Priority::default(),
            active_field: ReminderField::Title,
            editing: None,
        }
    }

    pub fn edit(reminder: &Reminder) -> Self {
        Self {
            title: reminder.title.clone(),
            notes: reminder.notes.clone().unwrap_or_default(),
            due_date: reminder
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            due_time: reminder
                .due_date
                .map(|d| d.format("%H:%M").to_string())
                .unwrap_or_else(|| "09:00".to_string()),
            priority: reminder.priority,
            active_field: ReminderField::Title,
            editing: Some(reminder.clone()),
        }
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            ReminderField::Title => Some(&mut self.title),
            ReminderField::Notes => Some(&mut self.notes),
            ReminderField::DueDate => Some(&mut self.due_date),
            ReminderField::DueTime => Some(&mut self.due_time),
            ReminderField::Priority => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(buf) = self.field_mut() {
            buf.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.field_mut() {
            buf.pop();
        }
    }

    pub fn cycle_priority(&mut self) {
        self.priority = self.priority.next();
    }

    /// The entered values, or `None` when the date or time does not parse.
    /// Title emptiness is left to validation. An edited reminder keeps its
    /// exact due instant while the date and time text are untouched.
    pub fn draft(&self) -> Option<ReminderDraft> {
        let due_date = if self.due_date.trim().is_empty() {
            None
        } else if let Some(due) = self.unchanged_due_date() {
            Some(due)
        } else {
            let date = NaiveDate::parse_from_str(self.due_date.trim(), "%Y-%m-%d").ok()?;
            let time = NaiveTime::parse_from_str(self.due_time.trim(), "%H:%M").ok()?;
            Some(Local.from_local_datetime(&date.and_time(time)).earliest()?)
        };
        let notes = Some(self.notes.trim().to_string()).filter(|n| !n.is_empty());

        Some(ReminderDraft {
            title: self.title.trim().to_string(),
            notes,
            due_date,
            priority: self.priority,
        })
    }

    fn unchanged_due_date(&self) -> Option<DateTime<Local>> {
        let due = self.editing.as_ref()?.due_date?;
        let same = self.due_date.trim() == due.format("%Y-%m-%d").to_string()
            && self.due_time.trim() == due.format("%H:%M").to_string();
        same.then_some(due)
    }
}

pub struct ReminderForm;

impl ReminderForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &ReminderFormState) {
        let title = if state.editing.is_some() {
            "Edit Reminder"
        } else {
            "New Reminder"
        };
        let inner = popup(frame, area, title, Color::Yellow, (50, 11));
        let rows = Layout::vertical([Constraint::Length(1); 7]).split(inner);

        let active = state.active_field;
        render_field(frame, rows[0], "Title:", &state.title, active == ReminderField::Title);
        render_field(frame, rows[1], "Notes:", &state.notes, active == ReminderField::Notes);
        render_field(frame, rows[2], "Due:", &state.due_date, active == ReminderField::DueDate);
        render_field(frame, rows[3], "At:", &state.due_time, active == ReminderField::DueTime);

        let priority_style = if active == ReminderField::Priority {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(theme::priority_color(state.priority))
        };
        let priority = Line::from(vec![
            Span::styled(format!("{:<7}", "Prio:"), theme::DIM_STYLE),
            Span::styled(format!("< {} >", state.priority.label()), priority_style),
        ]);
        frame.render_widget(Paragraph::new(priority), rows[4]);

        let help = hints(&[("Tab", "Next"), ("Space", "Priority"), ("Enter", "Save"), ("Esc", "Cancel")]);
        frame.render_widget(Paragraph::new(help), rows[6]);
    }
}
