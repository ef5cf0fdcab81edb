use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub start_date: DateTime<Local>,
    pub end_date: DateTime<Local>,
    pub is_all_day: bool,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub display_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    id: Uuid,
    pub title: String,
    pub start_date: DateTime<Local>,
    pub end_date: DateTime<Local>,
    pub is_all_day: bool,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub display_color: Option<String>,
}

impl CalendarEvent {
    pub fn create(draft: EventDraft) -> Result<Self, ValidationError> {
        let event = Self {
            id: Uuid::new_v4(),
            title: draft.title,
            start_date: draft.start_date,
            end_date: draft.end_date,
            is_all_day: draft.is_all_day,
            location: draft.location,
            notes: draft.notes,
            display_color: draft.display_color,
        };
        event.validate()?;
        Ok(event)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: Uuid,
        title: String,
        start_date: DateTime<Local>,
        end_date: DateTime<Local>,
        is_all_day: bool,
        location: Option<String>,
        notes: Option<String>,
        display_color: Option<String>,
    ) -> Self {
        Self {
            id,
            title,
            start_date,
            end_date,
            is_all_day,
            location,
            notes,
            display_color,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok(())
    }

    pub fn duration_display(&self) -> String {
        if self.is_all_day {
            "All day".to_string()
        } else {
            let start = self.start_date.format("%H:%M");
            let end = self.end_date.format("%H:%M");
            format!("{} - {}", start, end)
        }
    }
}
