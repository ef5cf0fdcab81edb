//! Error types for the reminders core.

use thiserror::Error;
use uuid::Uuid;

/// Failure reading from or writing to the durable store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Input rejected before it reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("event ends before it starts")]
    EndBeforeStart,

    #[error("timestamp out of storable range")]
    TimestampOutOfRange,
}

/// The platform refused or failed to register a notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("notification platform error: {0}")]
    Platform(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure of a planner operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no record with id {0}")]
    NotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_display_their_source() {
        let err: Error = ValidationError::EmptyTitle.into();
        assert_eq!(err.to_string(), "title must not be empty");

        let err: Error = StorageError::Corrupt {
            id: "abc".to_string(),
            reason: "bad priority 7".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "corrupt record abc: bad priority 7");

        let id = Uuid::nil();
        assert_eq!(
            Error::NotFound(id).to_string(),
            format!("no record with id {id}")
        );
    }
}
