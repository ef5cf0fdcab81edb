//! Local notifications for reminder due dates and event start times.

pub mod desktop;
pub mod scheduler;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::error::NotificationError;

pub use desktop::DesktopNotificationCenter;
pub use scheduler::{Scheduler, DEFAULT_LEAD_MINUTES};

pub const HIGH_PRIORITY_REMINDER: &str = "HIGH_PRIORITY_REMINDER";
pub const MEDIUM_PRIORITY_REMINDER: &str = "MEDIUM_PRIORITY_REMINDER";
pub const LOW_PRIORITY_REMINDER: &str = "LOW_PRIORITY_REMINDER";
pub const EVENT_REMINDER: &str = "EVENT_REMINDER";

pub const COMPLETE_ACTION: &str = "COMPLETE_ACTION";
pub const SNOOZE_ACTION: &str = "SNOOZE_ACTION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub id: String,
    pub title: String,
}

impl NotificationAction {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
        }
    }
}

/// Which buttons a delivered notification offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCategory {
    pub id: String,
    pub actions: Vec<NotificationAction>,
}

/// One pending notification, keyed by the id of the record it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub id: String,
    pub fire_at: DateTime<Local>,
    pub title: String,
    pub body: String,
    pub category: String,
    pub actions: Vec<NotificationAction>,
}

/// The platform notification service.
///
/// Requests sharing an id replace each other. Until authorization is
/// granted, requests are accepted and silently dropped.
#[async_trait]
pub trait NotificationCenter: Send + Sync {
    async fn request_authorization(&self) -> Result<bool, NotificationError>;

    async fn set_categories(&self, categories: Vec<NotificationCategory>);

    async fn request(&self, request: NotificationRequest) -> Result<(), NotificationError>;

    async fn cancel(&self, id: &str);

    /// Pending requests ordered by fire time.
    async fn pending(&self) -> Vec<NotificationRequest>;
}

/// The four static categories: high and medium reminders can be completed
/// or snoozed, low reminders only completed, events carry no actions.
pub fn default_categories() -> Vec<NotificationCategory> {
    let complete = NotificationAction::new(COMPLETE_ACTION, "Mark Complete");
    let snooze = NotificationAction::new(SNOOZE_ACTION, "Snooze 15 min");

    vec![
        NotificationCategory {
            id: HIGH_PRIORITY_REMINDER.to_string(),
            actions: vec![complete.clone(), snooze.clone()],
        },
        NotificationCategory {
            id: MEDIUM_PRIORITY_REMINDER.to_string(),
            actions: vec![complete.clone(), snooze],
        },
        NotificationCategory {
            id: LOW_PRIORITY_REMINDER.to_string(),
            actions: vec![complete],
        },
        NotificationCategory {
            id: EVENT_REMINDER.to_string(),
            actions: Vec::new(),
        },
    ]
}

/// Actions registered for `category` in [`default_categories`].
pub fn actions_for(category: &str) -> Vec<NotificationAction> {
    default_categories()
        .into_iter()
        .find(|c| c.id == category)
        .map(|c| c.actions)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_priority_cannot_be_snoozed() {
        let ids: Vec<String> = actions_for(LOW_PRIORITY_REMINDER)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![COMPLETE_ACTION.to_string()]);
    }

    #[test]
    fn high_and_medium_offer_complete_and_snooze() {
        for category in [HIGH_PRIORITY_REMINDER, MEDIUM_PRIORITY_REMINDER] {
            let ids: Vec<String> = actions_for(category).into_iter().map(|a| a.id).collect();
            assert_eq!(ids, vec![COMPLETE_ACTION.to_string(), SNOOZE_ACTION.to_string()]);
        }
    }

    #[test]
    fn events_have_no_actions() {
        assert!(actions_for(EVENT_REMINDER).is_empty());
        assert_eq!(default_categories().len(), 4);
    }
}
