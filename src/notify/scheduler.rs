use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};

use super::{
    actions_for, default_categories, NotificationCenter, NotificationRequest, EVENT_REMINDER,
    HIGH_PRIORITY_REMINDER, LOW_PRIORITY_REMINDER, MEDIUM_PRIORITY_REMINDER,
};
use crate::calendar::{CalendarEvent, Priority, Reminder};
use crate::clock::{self, Clock, SystemClock};

pub const DEFAULT_LEAD_MINUTES: u32 = 15;

/// Keeps at most one pending notification per reminder or event.
///
/// Platform failures are logged and swallowed; a missed local notification
/// never fails the caller.
pub struct Scheduler {
    center: Arc<dyn NotificationCenter>,
    clock: Arc<dyn Clock>,
}

impl Scheduler {
    pub fn new(center: Arc<dyn NotificationCenter>) -> Self {
        Self {
            center,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn request_permission(&self) -> bool {
        match self.center.request_authorization().await {
            Ok(granted) => {
                debug!(granted, "notification permission");
                granted
            }
            Err(err) => {
                warn!(error = %err, "notification permission request failed");
                false
            }
        }
    }

    pub async fn register_categories(&self) {
        self.center.set_categories(default_categories()).await;
    }

    /// The request `schedule_reminder_notification` would register, if any.
    /// A due time whose minute has already begun is not scheduled.
    pub fn reminder_request(&self, reminder: &Reminder) -> Option<NotificationRequest> {
        let due = reminder.due_date?;
        let now = self.clock.now();
        let fire_at = clock::truncate_to_minute(due);
        if due <= now || fire_at < now {
            return None;
        }

        let mut body = reminder.title.clone();
        if let Some(notes) = reminder.notes.as_deref().filter(|n| !n.is_empty()) {
            body.push('\n');
            body.push_str(notes);
        }

        let category = match reminder.priority {
            Priority::High => HIGH_PRIORITY_REMINDER,
            Priority::Medium => MEDIUM_PRIORITY_REMINDER,
            Priority::Low => LOW_PRIORITY_REMINDER,
        };

        Some(NotificationRequest {
            id: reminder.id().to_string(),
            fire_at,
            title: "Reminder".to_string(),
            body,
            category: category.to_string(),
            actions: actions_for(category),
        })
    }

    pub async fn schedule_reminder_notification(&self, reminder: &Reminder) {
        let Some(request) = self.reminder_request(reminder) else {
            debug!(id = %reminder.id(), "reminder has no future due date, not scheduling");
            return;
        };
        self.submit(request).await;
    }

    pub async fn cancel_reminder_notification(&self, reminder: &Reminder) {
        self.center.cancel(&reminder.id().to_string()).await;
    }

    pub fn event_request(
        &self,
        event: &CalendarEvent,
        minutes_before: u32,
    ) -> Option<NotificationRequest> {
        let now = self.clock.now();
        if event.start_date <= now {
            return None;
        }
        let notify_at = event.start_date - Duration::minutes(i64::from(minutes_before));
        let fire_at = clock::truncate_to_minute(notify_at);
        if notify_at <= now || fire_at < now {
            return None;
        }

        let mut body = event.title.clone();
        if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
            body.push_str(" at ");
            body.push_str(location);
        }
        body.push_str(&format!(" starts at {}", event.start_date.format("%H:%M")));

        Some(NotificationRequest {
            id: event.id().to_string(),
            fire_at,
            title: "Upcoming Event".to_string(),
            body,
            category: EVENT_REMINDER.to_string(),
            actions: actions_for(EVENT_REMINDER),
        })
    }

    pub async fn schedule_event_notification(&self, event: &CalendarEvent, minutes_before: u32) {
        let Some(request) = self.event_request(event, minutes_before) else {
            debug!(id = %event.id(), minutes_before, "event too close or past, not scheduling");
            return;
        };
        self.submit(request).await;
    }

    pub async fn cancel_event_notification(&self, event: &CalendarEvent) {
        self.center.cancel(&event.id().to_string()).await;
    }

    async fn submit(&self, request: NotificationRequest) {
        let id = request.id.clone();
        let fire_at = request.fire_at;
        match self.center.request(request).await {
            Ok(()) => debug!(%id, %fire_at, "scheduled notification"),
            Err(err) => warn!(%id, error = %err, "failed to schedule notification"),
        }
    }
}
