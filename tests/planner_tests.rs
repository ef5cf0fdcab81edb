use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone};
use reminders_tui::{
    Clock, DesktopNotificationCenter, Error, EventDraft, FixedClock, NotificationCenter, Planner,
    Priority, ReminderDraft, Scheduler, Store, ValidationError,
};
use tempfile::NamedTempFile;
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn now() -> DateTime<Local> {
    at(2026, 6, 10, 8, 0, 0)
}

async fn planner_with(store: Store) -> (Planner, Arc<DesktopNotificationCenter>) {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
    let center = Arc::new(DesktopNotificationCenter::new("test", true).with_clock(clock.clone()));
    let scheduler = Scheduler::new(center.clone()).with_clock(clock.clone());
    assert!(scheduler.request_permission().await);
    scheduler.register_categories().await;
    (Planner::new(store.with_clock(clock), scheduler), center)
}

async fn planner() -> (Planner, Arc<DesktopNotificationCenter>) {
    planner_with(Store::open_in_memory().unwrap()).await
}

fn draft(title: &str, due: Option<DateTime<Local>>) -> ReminderDraft {
    ReminderDraft {
        title: title.to_string(),
        notes: None,
        due_date: due,
        priority: Priority::Medium,
    }
}

fn meeting(start: DateTime<Local>) -> EventDraft {
    EventDraft {
        title: "Planning".to_string(),
        start_date: start,
        end_date: start + Duration::hours(1),
        is_all_day: false,
        location: None,
        notes: None,
        display_color: None,
    }
}

async fn pending_ids(center: &DesktopNotificationCenter) -> Vec<String> {
    center.pending().await.into_iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn added_reminder_is_stored_and_scheduled() {
    let (mut planner, center) = planner().await;
    let r = planner
        .add_reminder(draft("Pick up parcel", Some(at(2026, 6, 10, 18, 0, 0))))
        .await
        .unwrap();

    assert_eq!(planner.store().fetch_reminder(r.id()).unwrap(), Some(r.clone()));
    assert_eq!(pending_ids(&center).await, vec![r.id().to_string()]);
}

#[tokio::test]
async fn deleting_reminder_removes_record_and_notification() {
    let (mut planner, center) = planner().await;
    let r = planner
        .add_reminder(draft("Pick up parcel", Some(at(2026, 6, 10, 18, 0, 0))))
        .await
        .unwrap();

    planner.delete_reminder(r.id()).await.unwrap();

    assert_eq!(planner.store().fetch_reminder(r.id()).unwrap(), None);
    assert!(center.pending().await.is_empty());
}

#[tokio::test]
async fn completing_cancels_and_reopening_reschedules() {
    let (mut planner, center) = planner().await;
    let r = planner
        .add_reminder(draft("Book flights", Some(at(2026, 6, 12, 9, 0, 0))))
        .await
        .unwrap();

    let done = planner.toggle_reminder(r.id()).await.unwrap();
    assert!(done.is_completed);
    assert!(center.pending().await.is_empty());

    let reopened = planner.set_reminder_completed(r.id(), false).await.unwrap();
    assert!(!reopened.is_completed);
    assert_eq!(pending_ids(&center).await, vec![r.id().to_string()]);
}

#[tokio::test]
async fn clearing_due_date_cancels_notification() {
    let (mut planner, center) = planner().await;
    let mut r = planner
        .add_reminder(draft("Book flights", Some(at(2026, 6, 12, 9, 0, 0))))
        .await
        .unwrap();

    r.due_date = None;
    planner.update_reminder(&r).await.unwrap();

    assert!(center.pending().await.is_empty());
    assert_eq!(
        planner.store().fetch_reminder(r.id()).unwrap().unwrap().due_date,
        None
    );
}

#[tokio::test]
async fn invalid_reminder_touches_nothing() {
    let (mut planner, center) = planner().await;
    let err = planner
        .add_reminder(draft("   ", Some(at(2026, 6, 12, 9, 0, 0))))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(ValidationError::EmptyTitle)));
    assert!(planner.store().fetch_reminders(None).unwrap().is_empty());
    assert!(!planner.store().has_changes());
    assert!(center.pending().await.is_empty());
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let (mut planner, _center) = planner().await;
    let id = Uuid::new_v4();

    assert!(matches!(planner.toggle_reminder(id).await, Err(Error::NotFound(missing)) if missing == id));
    assert!(matches!(planner.delete_reminder(id).await, Err(Error::NotFound(_))));
    assert!(matches!(planner.delete_event(id).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn event_lifecycle_follows_lead_time() {
    let (mut planner, center) = planner().await;
    let mut ev = planner
        .add_event(meeting(at(2026, 6, 10, 10, 0, 0)))
        .await
        .unwrap();

    let pending = center.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].fire_at, at(2026, 6, 10, 9, 45, 0));

    ev.start_date = at(2026, 6, 10, 11, 0, 0);
    ev.end_date = at(2026, 6, 10, 12, 0, 0);
    planner.update_event(&ev).await.unwrap();
    let pending = center.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].fire_at, at(2026, 6, 10, 10, 45, 0));

    planner.delete_event(ev.id()).await.unwrap();
    assert!(center.pending().await.is_empty());
    assert_eq!(planner.store().fetch_event(ev.id()).unwrap(), None);
}

#[tokio::test]
async fn custom_lead_time_is_used() {
    let (planner, center) = planner().await;
    let mut planner = planner.with_lead_minutes(60);
    planner
        .add_event(meeting(at(2026, 6, 10, 10, 0, 0)))
        .await
        .unwrap();

    assert_eq!(center.pending().await[0].fire_at, at(2026, 6, 10, 9, 0, 0));
}

#[tokio::test]
async fn reschedule_all_covers_open_future_records() {
    let store = Store::open_in_memory().unwrap();
    let (mut planner, center) = planner_with(store).await;

    let open = planner
        .add_reminder(draft("open", Some(at(2026, 6, 11, 9, 0, 0))))
        .await
        .unwrap();
    let done = planner
        .add_reminder(draft("done", Some(at(2026, 6, 11, 10, 0, 0))))
        .await
        .unwrap();
    planner.set_reminder_completed(done.id(), true).await.unwrap();
    planner
        .add_reminder(draft("undated", None))
        .await
        .unwrap();
    let ev = planner
        .add_event(meeting(at(2026, 6, 12, 10, 0, 0)))
        .await
        .unwrap();

    for request in center.pending().await {
        center.cancel(&request.id).await;
    }
    planner.reschedule_all().await.unwrap();

    let mut ids = pending_ids(&center).await;
    ids.sort();
    let mut expected = vec![open.id().to_string(), ev.id().to_string()];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn failed_save_surfaces_error_and_schedules_nothing() {
    let file = NamedTempFile::new().unwrap();
    let (mut planner, center) = planner_with(Store::open(file.path()).unwrap()).await;

    let other = rusqlite::Connection::open(file.path()).unwrap();
    other.execute_batch("DROP TABLE reminders;").unwrap();

    let err = planner
        .add_reminder(draft("doomed", Some(at(2026, 6, 11, 9, 0, 0))))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Storage(_)));
    assert!(!planner.store().has_changes());
    assert!(center.pending().await.is_empty());
}
