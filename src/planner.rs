//! Keeps stored records and their pending notifications consistent.

use tracing::info;
use uuid::Uuid;

use crate::calendar::{
    CalendarEvent, EventDraft, EventPredicate, Reminder, ReminderDraft, ReminderPredicate, Store,
};
use crate::error::{Error, Result};
use crate::notify::{Scheduler, DEFAULT_LEAD_MINUTES};

/// Application-level operations over a [`Store`] and a [`Scheduler`].
///
/// Every mutation is saved before its notification is touched, so a
/// notification never outlives a failed write. A failed save discards
/// the operation's staged changes.
pub struct Planner {
    store: Store,
    scheduler: Scheduler,
    lead_minutes: u32,
}

impl Planner {
    pub fn new(store: Store, scheduler: Scheduler) -> Self {
        Self {
            store,
            scheduler,
            lead_minutes: DEFAULT_LEAD_MINUTES,
        }
    }

    pub fn with_lead_minutes(mut self, minutes: u32) -> Self {
        self.lead_minutes = minutes;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    // ── Reminders ──

    pub async fn add_reminder(&mut self, draft: ReminderDraft) -> Result<Reminder> {
        let reminder = Reminder::create(draft)?;
        self.store.upsert_reminder(&reminder)?;
        self.commit()?;
        self.sync_reminder(&reminder).await;
        Ok(reminder)
    }

    pub async fn update_reminder(&mut self, reminder: &Reminder) -> Result<()> {
        self.existing_reminder(reminder.id())?;
        self.store.upsert_reminder(reminder)?;
        self.commit()?;
        self.sync_reminder(reminder).await;
        Ok(())
    }

    pub async fn set_reminder_completed(&mut self, id: Uuid, completed: bool) -> Result<Reminder> {
        let mut reminder = self.existing_reminder(id)?;
        reminder.is_completed = completed;
        self.store.upsert_reminder(&reminder)?;
        self.commit()?;
        self.sync_reminder(&reminder).await;
        Ok(reminder)
    }

    pub async fn toggle_reminder(&mut self, id: Uuid) -> Result<Reminder> {
        let current = self.existing_reminder(id)?;
        self.set_reminder_completed(id, !current.is_completed).await
    }

    pub async fn delete_reminder(&mut self, id: Uuid) -> Result<()> {
        let reminder = self.existing_reminder(id)?;
        self.store.delete_reminder(id);
        self.commit()?;
        self.scheduler.cancel_reminder_notification(&reminder).await;
        Ok(())
    }

    // ── Events ──

    pub async fn add_event(&mut self, draft: EventDraft) -> Result<CalendarEvent> {
        let event = CalendarEvent::create(draft)?;
        self.store.upsert_event(&event)?;
        self.commit()?;
        self.sync_event(&event).await;
        Ok(event)
    }

    pub async fn update_event(&mut self, event: &CalendarEvent) -> Result<()> {
        self.existing_event(event.id())?;
        self.store.upsert_event(event)?;
        self.commit()?;
        self.sync_event(event).await;
        Ok(())
    }

    pub async fn delete_event(&mut self, id: Uuid) -> Result<()> {
        let event = self.existing_event(id)?;
        self.store.delete_event(id);
        self.commit()?;
        self.scheduler.cancel_event_notification(&event).await;
        Ok(())
    }

    /// Register notifications for every open dated reminder and future event.
    pub async fn reschedule_all(&self) -> Result<()> {
        let now = self.store.now();
        let reminders = self.store.fetch_reminders(Some(
            &ReminderPredicate::Completed(false).and(ReminderPredicate::DueOnOrAfter(now)),
        ))?;
        let events = self
            .store
            .fetch_events(Some(&EventPredicate::StartsOnOrAfter(now)))?;

        for reminder in &reminders {
            self.scheduler.schedule_reminder_notification(reminder).await;
        }
        for event in &events {
            self.scheduler
                .schedule_event_notification(event, self.lead_minutes)
                .await;
        }
        info!(
            reminders = reminders.len(),
            events = events.len(),
            "rescheduled notifications"
        );
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if let Err(err) = self.store.save() {
            self.store.discard_changes();
            return Err(err.into());
        }
        Ok(())
    }

    fn existing_reminder(&self, id: Uuid) -> Result<Reminder> {
        self.store.fetch_reminder(id)?.ok_or(Error::NotFound(id))
    }

    fn existing_event(&self, id: Uuid) -> Result<CalendarEvent> {
        self.store.fetch_event(id)?.ok_or(Error::NotFound(id))
    }

    async fn sync_reminder(&self, reminder: &Reminder) {
        self.scheduler.cancel_reminder_notification(reminder).await;
        if !reminder.is_completed {
            self.scheduler.schedule_reminder_notification(reminder).await;
        }
    }

    async fn sync_event(&self, event: &CalendarEvent) {
        self.scheduler.cancel_event_notification(event).await;
        self.scheduler
            .schedule_event_notification(event, self.lead_minutes)
            .await;
    }
}
