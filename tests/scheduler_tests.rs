use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone};
use reminders_tui::notify::{
    NotificationCategory, NotificationRequest, COMPLETE_ACTION, EVENT_REMINDER,
    HIGH_PRIORITY_REMINDER, LOW_PRIORITY_REMINDER, SNOOZE_ACTION,
};
use reminders_tui::{
    CalendarEvent, Clock, DesktopNotificationCenter, EventDraft, FixedClock, NotificationCenter,
    NotificationError, Priority, Reminder, ReminderDraft, Scheduler,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn now() -> DateTime<Local> {
    at(2026, 6, 10, 8, 0, 0)
}

async fn authorized() -> (Scheduler, Arc<DesktopNotificationCenter>) {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
    let center = Arc::new(DesktopNotificationCenter::new("test", true).with_clock(clock.clone()));
    let scheduler = Scheduler::new(center.clone()).with_clock(clock);
    assert!(scheduler.request_permission().await);
    scheduler.register_categories().await;
    (scheduler, center)
}

fn reminder(due: Option<DateTime<Local>>, priority: Priority) -> Reminder {
    Reminder::create(ReminderDraft {
        title: "Pay rent".to_string(),
        notes: None,
        due_date: due,
        priority,
    })
    .unwrap()
}

fn standup(start: DateTime<Local>, location: Option<&str>) -> CalendarEvent {
    CalendarEvent::create(EventDraft {
        title: "Standup".to_string(),
        start_date: start,
        end_date: start + Duration::minutes(15),
        is_all_day: false,
        location: location.map(str::to_string),
        notes: None,
        display_color: None,
    })
    .unwrap()
}

fn action_ids(request: &NotificationRequest) -> Vec<&str> {
    request.actions.iter().map(|a| a.id.as_str()).collect()
}

#[tokio::test]
async fn reminder_fires_at_due_minute_with_notes_in_body() {
    let (scheduler, center) = authorized().await;
    let mut r = reminder(Some(at(2026, 6, 10, 17, 30, 45)), Priority::High);
    r.notes = Some("transfer before 6".to_string());

    scheduler.schedule_reminder_notification(&r).await;

    let pending = center.pending().await;
    assert_eq!(pending.len(), 1);
    let request = &pending[0];
    assert_eq!(request.id, r.id().to_string());
    assert_eq!(request.fire_at, at(2026, 6, 10, 17, 30, 0));
    assert_eq!(request.title, "Reminder");
    assert_eq!(request.body, "Pay rent\ntransfer before 6");
    assert_eq!(request.category, HIGH_PRIORITY_REMINDER);
    assert_eq!(action_ids(request), vec![COMPLETE_ACTION, SNOOZE_ACTION]);
}

#[tokio::test]
async fn scheduling_twice_keeps_only_the_latest_request() {
    let (scheduler, center) = authorized().await;
    let mut r = reminder(Some(at(2026, 6, 10, 12, 0, 0)), Priority::Medium);
    scheduler.schedule_reminder_notification(&r).await;

    r.due_date = Some(at(2026, 6, 11, 9, 0, 0));
    r.priority = Priority::Low;
    scheduler.schedule_reminder_notification(&r).await;

    let pending = center.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].fire_at, at(2026, 6, 11, 9, 0, 0));
    assert_eq!(pending[0].category, LOW_PRIORITY_REMINDER);
    assert_eq!(action_ids(&pending[0]), vec![COMPLETE_ACTION]);
}

#[tokio::test]
async fn reminders_without_future_due_date_are_skipped() {
    let (scheduler, center) = authorized().await;

    scheduler
        .schedule_reminder_notification(&reminder(None, Priority::High))
        .await;
    scheduler
        .schedule_reminder_notification(&reminder(Some(now()), Priority::High))
        .await;
    scheduler
        .schedule_reminder_notification(&reminder(Some(now() - Duration::hours(1)), Priority::High))
        .await;

    assert!(center.pending().await.is_empty());
}

#[test]
fn due_time_inside_the_current_minute_is_not_scheduled() {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(at(2026, 6, 10, 8, 0, 10)));
    let center = Arc::new(DesktopNotificationCenter::new("test", true));
    let scheduler = Scheduler::new(center).with_clock(clock);

    let this_minute = reminder(Some(at(2026, 6, 10, 8, 0, 50)), Priority::High);
    assert!(scheduler.reminder_request(&this_minute).is_none());

    let next_minute = reminder(Some(at(2026, 6, 10, 8, 1, 5)), Priority::High);
    let request = scheduler.reminder_request(&next_minute).unwrap();
    assert_eq!(request.fire_at, at(2026, 6, 10, 8, 1, 0));

    // Start 08:15:40 less 15 minutes lands at 08:00:40, inside the current minute.
    let soon = standup(at(2026, 6, 10, 8, 15, 40), None);
    assert!(scheduler.event_request(&soon, 15).is_none());
    assert!(scheduler.event_request(&soon, 14).is_some());
}

#[test]
fn due_time_on_the_current_minute_boundary_fires_now() {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
    let center = Arc::new(DesktopNotificationCenter::new("test", true));
    let scheduler = Scheduler::new(center).with_clock(clock);

    let request = scheduler
        .reminder_request(&reminder(Some(now() + Duration::seconds(30)), Priority::Low))
        .unwrap();
    assert_eq!(request.fire_at, now());
}

#[tokio::test]
async fn cancelling_removes_only_that_request() {
    let (scheduler, center) = authorized().await;
    let first = reminder(Some(at(2026, 6, 10, 12, 0, 0)), Priority::Medium);
    let second = reminder(Some(at(2026, 6, 10, 13, 0, 0)), Priority::Medium);
    scheduler.schedule_reminder_notification(&first).await;
    scheduler.schedule_reminder_notification(&second).await;

    scheduler.cancel_reminder_notification(&first).await;

    let ids: Vec<String> = center.pending().await.into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id().to_string()]);
}

#[tokio::test]
async fn cancelling_with_nothing_pending_is_a_noop() {
    let (scheduler, center) = authorized().await;
    scheduler
        .cancel_reminder_notification(&reminder(None, Priority::Low))
        .await;
    scheduler
        .cancel_event_notification(&standup(at(2026, 6, 10, 9, 30, 0), None))
        .await;
    assert!(center.pending().await.is_empty());
}

#[tokio::test]
async fn event_notification_fires_lead_time_before_start() {
    let (scheduler, center) = authorized().await;
    let ev = standup(at(2026, 6, 10, 9, 30, 0), Some("Room 4"));

    scheduler.schedule_event_notification(&ev, 15).await;

    let pending = center.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].fire_at, at(2026, 6, 10, 9, 15, 0));
    assert_eq!(pending[0].title, "Upcoming Event");
    assert_eq!(pending[0].body, "Standup at Room 4 starts at 09:30");
    assert_eq!(pending[0].category, EVENT_REMINDER);
    assert!(pending[0].actions.is_empty());
}

#[test]
fn event_body_omits_missing_location() {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
    let center = Arc::new(DesktopNotificationCenter::new("test", true));
    let scheduler = Scheduler::new(center).with_clock(clock);

    let request = scheduler
        .event_request(&standup(at(2026, 6, 10, 14, 5, 0), Some("")), 10)
        .unwrap();
    assert_eq!(request.body, "Standup starts at 14:05");
    assert_eq!(request.fire_at, at(2026, 6, 10, 13, 55, 0));
}

#[tokio::test]
async fn events_inside_the_lead_window_or_past_are_skipped() {
    let (scheduler, center) = authorized().await;

    // Starts in ten minutes, so a fifteen minute warning is already late.
    scheduler
        .schedule_event_notification(&standup(now() + Duration::minutes(10), None), 15)
        .await;
    scheduler
        .schedule_event_notification(&standup(now() + Duration::minutes(15), None), 15)
        .await;
    scheduler
        .schedule_event_notification(&standup(now() - Duration::minutes(5), None), 0)
        .await;
    scheduler
        .schedule_event_notification(&standup(now(), None), 0)
        .await;

    assert!(center.pending().await.is_empty());
}

#[tokio::test]
async fn requests_before_authorization_are_dropped() {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
    let center = Arc::new(DesktopNotificationCenter::new("test", false).with_clock(clock.clone()));
    let scheduler = Scheduler::new(center.clone()).with_clock(clock);

    scheduler
        .schedule_reminder_notification(&reminder(Some(at(2026, 6, 11, 9, 0, 0)), Priority::High))
        .await;
    assert!(center.pending().await.is_empty());

    assert!(!scheduler.request_permission().await);
    scheduler
        .schedule_reminder_notification(&reminder(Some(at(2026, 6, 11, 9, 0, 0)), Priority::High))
        .await;
    assert!(center.pending().await.is_empty());
}

#[derive(Default)]
struct FailingCenter {
    attempts: Mutex<usize>,
}

#[async_trait]
impl NotificationCenter for FailingCenter {
    async fn request_authorization(&self) -> Result<bool, NotificationError> {
        Err(NotificationError::Platform("no session bus".to_string()))
    }

    async fn set_categories(&self, _categories: Vec<NotificationCategory>) {}

    async fn request(&self, _request: NotificationRequest) -> Result<(), NotificationError> {
        *self.attempts.lock().unwrap() += 1;
        Err(NotificationError::Platform("no session bus".to_string()))
    }

    async fn cancel(&self, _id: &str) {}

    async fn pending(&self) -> Vec<NotificationRequest> {
        Vec::new()
    }
}

#[tokio::test]
async fn platform_failures_are_swallowed() {
    let center = Arc::new(FailingCenter::default());
    let scheduler =
        Scheduler::new(center.clone()).with_clock(Arc::new(FixedClock(now())));

    assert!(!scheduler.request_permission().await);
    scheduler
        .schedule_reminder_notification(&reminder(Some(at(2026, 6, 11, 9, 0, 0)), Priority::Low))
        .await;
    scheduler
        .schedule_event_notification(&standup(at(2026, 6, 11, 9, 0, 0), None), 15)
        .await;

    assert_eq!(*center.attempts.lock().unwrap(), 2);
}
