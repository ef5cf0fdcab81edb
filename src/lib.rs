//! Reminders and calendar events with local notifications.
//!
//! [`calendar::Store`] persists records in SQLite, [`notify::Scheduler`]
//! maps them to pending notifications, and [`planner::Planner`] keeps the
//! two in step.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod notify;
pub mod planner;

pub use calendar::{CalendarEvent, EventDraft, Priority, Reminder, ReminderDraft, Store};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{Error, NotificationError, Result, StorageError, ValidationError};
pub use notify::{DesktopNotificationCenter, NotificationCenter, Scheduler};
pub use planner::Planner;
