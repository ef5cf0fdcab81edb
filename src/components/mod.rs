pub mod agenda;
pub mod event_form;
pub mod form;
pub mod reminder_form;
pub mod reminder_list;

pub use agenda::Agenda;
pub use event_form::EventForm;
pub use reminder_form::ReminderForm;
pub use reminder_list::ReminderList;
