use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub(crate) fn as_i64(self) -> i64 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    pub(crate) fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Priority::Low),
            1 => Some(Priority::Medium),
            2 => Some(Priority::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Cycle low -> medium -> high -> low.
    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

/// User-entered fields for a reminder that does not exist yet.
#[derive(Debug, Clone, Default)]
pub struct ReminderDraft {
    pub title: String,
    pub notes: Option<String>,
    pub due_date: Option<DateTime<Local>>,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    id: Uuid,
    pub title: String,
    pub notes: Option<String>,
    pub due_date: Option<DateTime<Local>>,
    pub priority: Priority,
    pub is_completed: bool,
}

impl Reminder {
    /// Validate a draft and assign it a fresh id.
    pub fn create(draft: ReminderDraft) -> Result<Self, ValidationError> {
        let reminder = Self {
            id: Uuid::new_v4(),
            title: draft.title,
            notes: draft.notes,
            due_date: draft.due_date,
            priority: draft.priority,
            is_completed: false,
        };
        reminder.validate()?;
        Ok(reminder)
    }

    pub(crate) fn from_parts(
        id: Uuid,
        title: String,
        notes: Option<String>,
        due_date: Option<DateTime<Local>>,
        priority: Priority,
        is_completed: bool,
    ) -> Self {
        Self {
            id,
            title,
            notes,
            due_date,
            priority,
            is_completed,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }

    pub fn is_overdue(&self, now: DateTime<Local>) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < now)
    }
}
