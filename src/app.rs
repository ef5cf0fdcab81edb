use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use reminders_tui::calendar::ReminderPredicate;
use reminders_tui::{CalendarEvent, Error, Planner, Reminder};

use crate::components::event_form::EventFormState;
use crate::components::reminder_form::ReminderFormState;

const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Reminders,
    Events,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReminderView {
    Today,
    Overdue,
    Open,
    All,
}

impl ReminderView {
    pub fn next(self) -> Self {
        match self {
            ReminderView::Today => ReminderView::Overdue,
            ReminderView::Overdue => ReminderView::Open,
            ReminderView::Open => ReminderView::All,
            ReminderView::All => ReminderView::Today,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReminderView::Today => "Today",
            ReminderView::Overdue => "Overdue",
            ReminderView::Open => "Open",
            ReminderView::All => "All",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    ReminderForm,
    EventForm,
}

pub struct App {
    pub running: bool,
    pub focus: Focus,
    pub reminder_view: ReminderView,
    pub input_mode: InputMode,
    pub reminders: Vec<Reminder>,
    pub overdue_count: usize,
    pub events: Vec<CalendarEvent>,
    pub selected_reminder: usize,
    pub selected_event: usize,
    pub reminder_form: Option<ReminderFormState>,
    pub event_form: Option<EventFormState>,
    pub show_detail: bool,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub notifications_granted: bool,
    pub upcoming_days: u32,
    last_refresh: Instant,
    planner: Planner,
}

impl App {
    pub fn new(planner: Planner, upcoming_days: u32) -> Self {
        Self {
            running: true,
            focus: Focus::Reminders,
            reminder_view: ReminderView::Today,
            input_mode: InputMode::Normal,
            reminders: Vec::new(),
            overdue_count: 0,
            events: Vec::new(),
            selected_reminder: 0,
            selected_event: 0,
            reminder_form: None,
            event_form: None,
            show_detail: false,
            show_help: false,
            status_message: None,
            notifications_granted: false,
            upcoming_days,
            last_refresh: Instant::now(),
            planner,
        }
    }

    /// Ask for notification permission, register categories and re-arm
    /// notifications for everything already stored.
    pub async fn start(&mut self) {
        let scheduler = self.planner.scheduler();
        self.notifications_granted = scheduler.request_permission().await;
        scheduler.register_categories().await;

        if self.notifications_granted {
            if let Err(err) = self.planner.reschedule_all().await {
                self.report(err);
            }
        } else {
            self.status_message = Some("Notifications disabled".to_string());
        }
        self.refresh();
    }

    pub fn now(&self) -> DateTime<Local> {
        self.planner.store().now()
    }

    pub fn refresh(&mut self) {
        self.last_refresh = Instant::now();
        let store = self.planner.store();

        let reminders = match self.reminder_view {
            ReminderView::Today => store.fetch_today_reminders(),
            ReminderView::Overdue => store.fetch_overdue_reminders(),
            ReminderView::Open => store.fetch_reminders(Some(&ReminderPredicate::Completed(false))),
            ReminderView::All => store.fetch_reminders(None),
        };
        let overdue = store.fetch_overdue_reminders();
        let events = store.fetch_upcoming_events(self.upcoming_days);

        match (reminders, overdue, events) {
            (Ok(reminders), Ok(overdue), Ok(events)) => {
                self.reminders = reminders;
                self.overdue_count = overdue.len();
                self.events = events;
            }
            (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
                self.report(err.into());
            }
        }

        self.selected_reminder = self
            .selected_reminder
            .min(self.reminders.len().saturating_sub(1));
        self.selected_event = self.selected_event.min(self.events.len().saturating_sub(1));
    }

    /// Refresh once a minute so "overdue" and "today" follow the clock.
    pub fn tick(&mut self) {
        if self.last_refresh.elapsed() >= REFRESH_INTERVAL {
            self.refresh();
        }
    }

    pub fn report(&mut self, err: Error) {
        tracing::warn!(error = %err, "operation failed");
        self.status_message = Some(match err {
            Error::Storage(e) => format!("Storage error: {e}. Check the database file and retry"),
            Error::Validation(e) => format!("Invalid input: {e}"),
            other => other.to_string(),
        });
    }

    pub fn cycle_reminder_view(&mut self) {
        self.reminder_view = self.reminder_view.next();
        self.selected_reminder = 0;
        self.refresh();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Reminders => Focus::Events,
            Focus::Events => Focus::Reminders,
        };
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Reminders => {
                if self.selected_reminder + 1 < self.reminders.len() {
                    self.selected_reminder += 1;
                }
            }
            Focus::Events => {
                if self.selected_event + 1 < self.events.len() {
                    self.selected_event += 1;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Reminders => self.selected_reminder = self.selected_reminder.saturating_sub(1),
            Focus::Events => self.selected_event = self.selected_event.saturating_sub(1),
        }
    }

    pub fn selected_reminder(&self) -> Option<&Reminder> {
        self.reminders.get(self.selected_reminder)
    }

    pub fn selected_event(&self) -> Option<&CalendarEvent> {
        self.events.get(self.selected_event)
    }

    pub async fn toggle_selected_reminder(&mut self) {
        let Some(id) = self.selected_reminder().map(|r| r.id()) else {
            return;
        };
        match self.planner.toggle_reminder(id).await {
            Ok(reminder) => {
                let state = if reminder.is_completed { "completed" } else { "reopened" };
                self.status_message = Some(format!("\"{}\" {}", reminder.title, state));
                self.refresh();
            }
            Err(err) => self.report(err),
        }
    }

    pub async fn delete_selected(&mut self) {
        let result = match self.focus {
            Focus::Reminders => match self.selected_reminder().map(|r| r.id()) {
                Some(id) => self.planner.delete_reminder(id).await,
                None => return,
            },
            Focus::Events => match self.selected_event().map(|e| e.id()) {
                Some(id) => self.planner.delete_event(id).await,
                None => return,
            },
        };
        match result {
            Ok(()) => {
                self.status_message = Some("Deleted".to_string());
                self.refresh();
            }
            Err(err) => self.report(err),
        }
    }

    // ── Forms ──

    pub fn open_new_form(&mut self) {
        match self.focus {
            Focus::Reminders => {
                self.reminder_form = Some(ReminderFormState::new(self.now().date_naive()));
                self.input_mode = InputMode::ReminderForm;
            }
            Focus::Events => {
                self.event_form = Some(EventFormState::new(self.now().date_naive()));
                self.input_mode = InputMode::EventForm;
            }
        }
    }

    pub fn open_edit_form(&mut self) {
        if self.focus != Focus::Reminders {
            return;
        }
        if let Some(reminder) = self.selected_reminder() {
            self.reminder_form = Some(ReminderFormState::edit(reminder));
            self.input_mode = InputMode::ReminderForm;
        }
    }

    pub fn close_form(&mut self) {
        self.reminder_form = None;
        self.event_form = None;
        self.input_mode = InputMode::Normal;
    }

    pub async fn submit_reminder_form(&mut self) {
        let Some(form) = self.reminder_form.as_ref() else {
            return;
        };
        let Some(draft) = form.draft() else {
            self.status_message = Some("Check the due date (YYYY-MM-DD) and time (HH:MM)".to_string());
            return;
        };

        let result = match form.editing.clone() {
            Some(mut existing) => {
                existing.title = draft.title;
                existing.notes = draft.notes;
                existing.due_date = draft.due_date;
                existing.priority = draft.priority;
                self.planner.update_reminder(&existing).await
            }
            None => self.planner.add_reminder(draft).await.map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.status_message = Some("Reminder saved".to_string());
                self.close_form();
                self.refresh();
            }
            Err(err) => self.report(err),
        }
    }

    pub async fn submit_event_form(&mut self) {
        let Some(draft) = self.event_form.as_ref().and_then(|f| f.draft()) else {
            self.status_message = Some("Check the date and times".to_string());
            return;
        };
        match self.planner.add_event(draft).await {
            Ok(event) => {
                self.status_message = Some(format!("Event \"{}\" created", event.title));
                self.close_form();
                self.refresh();
            }
            Err(err) => self.report(err),
        }
    }
}
