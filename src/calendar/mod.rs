pub mod event;
pub mod predicate;
pub mod reminder;
pub mod store;

pub use event::{CalendarEvent, EventDraft};
pub use predicate::{EventPredicate, ReminderPredicate};
pub use reminder::{Priority, Reminder, ReminderDraft};
pub use store::{Store, DEFAULT_UPCOMING_DAYS};
