use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Color,
    widgets::Paragraph,
    Frame,
};
use reminders_tui::clock::day_bounds;
use reminders_tui::EventDraft;

use super::form::{hints, popup, render_field};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventField {
    Title,
    Date,
    Start,
    End,
    AllDay,
    Location,
}

const EVENT_FIELDS: [EventField; 6] = [
    EventField::Title,
    EventField::Date,
    EventField::Start,
    EventField::End,
    EventField::AllDay,
    EventField::Location,
];

impl EventField {
    fn position(self) -> usize {
        EVENT_FIELDS.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        EVENT_FIELDS[(self.position() + 1) % EVENT_FIELDS.len()]
    }

    pub fn prev(self) -> Self {
        EVENT_FIELDS[(self.position() + EVENT_FIELDS.len() - 1) % EVENT_FIELDS.len()]
    }
}

#[derive(Debug, Clone)]
pub struct EventFormState {
    pub title: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub is_all_day: bool,
    pub location: String,
    pub active_field: EventField,
}

impl EventFormState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            title: String::new(),
            date: date.format("%Y-%m-%d").to_string(),
            start: "09:00".to_string(),
            end: "10:00".to_string(),
            is_all_day: false,
            location: String::new(),
            active_field: EventField::Title,
        }
    }

    /// The text buffer behind the active field. Toggles have none, and
    /// neither do the times of an all-day event.
    fn field_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            EventField::Title => Some(&mut self.title),
            EventField::Date => Some(&mut self.date),
            EventField::Start if !self.is_all_day => Some(&mut self.start),
            EventField::End if !self.is_all_day => Some(&mut self.end),
            EventField::Location => Some(&mut self.location),
            _ => None,
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

    pub fn toggle_all_day(&mut self) {
        self.is_all_day = !self.is_all_day;
    }

    /// Parsed form values. All-day events span the whole local day.
    pub fn draft(&self) -> Option<EventDraft> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()?;
        let (start_date, end_date) = if self.is_all_day {
            day_bounds(date)
        } else {
            let at = |text: &str| {
                let time = NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()?;
                Local.from_local_datetime(&date.and_time(time)).earliest()
            };
            (at(&self.start)?, at(&self.end)?)
        };
        let location = Some(self.location.trim().to_string()).filter(|l| !l.is_empty());

        Some(EventDraft {
            title: self.title.trim().to_string(),
            start_date,
            end_date,
            is_all_day: self.is_all_day,
            location,
            notes: None,
            display_color: None,
        })
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        let inner = popup(frame, area, "New Event", Color::Green, (50, 12));
        let rows = Layout::vertical([Constraint::Length(1); 8]).split(inner);

        let active = state.active_field;
        let (start, end) = if state.is_all_day {
            ("--:--", "--:--")
        } else {
            (state.start.as_str(), state.end.as_str())
        };
        let all_day = if state.is_all_day { "[x] All day" } else { "[ ] All day" };

        let fields = [
            ("Title:", state.title.as_str(), EventField::Title),
            ("Date:", state.date.as_str(), EventField::Date),
            ("Start:", start, EventField::Start),
            ("End:", end, EventField::End),
            ("", all_day, EventField::AllDay),
            ("Where:", state.location.as_str(), EventField::Location),
        ];
        for (row, (label, value, field)) in rows.iter().zip(fields) {
            let editable = !(state.is_all_day && matches!(field, EventField::Start | EventField::End));
            render_field(frame, *row, label, value, editable && active == field);
        }

        let help = hints(&[("Tab", "Next"), ("Space", "Toggle"), ("Enter", "Save"), ("Esc", "Cancel")]);
        frame.render_widget(Paragraph::new(help), rows[7]);
    }
}
