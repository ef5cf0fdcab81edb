use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use tracing::{debug, warn};
use uuid::Uuid;

use super::event::CalendarEvent;
use super::predicate::{from_nanos, to_nanos, EventPredicate, ReminderPredicate, WriteSql};
use super::reminder::{Priority, Reminder};
use crate::clock::{self, Clock, SystemClock};
use crate::error::{StorageError, ValidationError};

pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS reminders (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        notes TEXT,
        due_date INTEGER,
        priority INTEGER NOT NULL,
        is_completed INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX IF NOT EXISTS reminders_due_date ON reminders (due_date);
    CREATE TABLE IF NOT EXISTS calendar_events (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        start_date INTEGER NOT NULL,
        end_date INTEGER NOT NULL,
        is_all_day INTEGER NOT NULL DEFAULT 0,
        location TEXT,
        notes TEXT,
        display_color TEXT
    );
    CREATE INDEX IF NOT EXISTS calendar_events_start_date ON calendar_events (start_date);
"#;

const REMINDER_COLUMNS: &str = "id, title, notes, due_date, priority, is_completed";
const REMINDER_ORDER: &str = "ORDER BY due_date IS NULL, due_date ASC, priority DESC, title ASC, id ASC";

const EVENT_COLUMNS: &str =
    "id, title, start_date, end_date, is_all_day, location, notes, display_color";
const EVENT_ORDER: &str = "ORDER BY start_date ASC, title ASC, id ASC";

/// Row values encoded at staging time so `save` cannot fail on conversion.
struct ReminderRow {
    id: String,
    title: String,
    notes: Option<String>,
    due_date: Option<i64>,
    priority: i64,
    is_completed: bool,
}

struct EventRow {
    id: String,
    title: String,
    start_date: i64,
    end_date: i64,
    is_all_day: bool,
    location: Option<String>,
    notes: Option<String>,
    display_color: Option<String>,
}

enum Change {
    UpsertReminder(ReminderRow),
    DeleteReminder(Uuid),
    UpsertEvent(EventRow),
    DeleteEvent(Uuid),
}

/// Durable reminder and event collections.
///
/// Mutations are staged in memory and written in a single transaction by
/// [`Store::save`]. Reads only see committed rows.
pub struct Store {
    conn: Connection,
    clock: Arc<dyn Clock>,
    pending: Vec<Change>,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened store");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            clock: Arc::new(SystemClock),
            pending: Vec::new(),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    // ── Reminders ──

    pub fn fetch_reminders(
        &self,
        predicate: Option<&ReminderPredicate>,
    ) -> Result<Vec<Reminder>, StorageError> {
        self.query_reminders(predicate)
            .inspect_err(|err| warn!(error = %err, "failed to fetch reminders"))
    }

    pub fn fetch_overdue_reminders(&self) -> Result<Vec<Reminder>, StorageError> {
        let predicate = ReminderPredicate::DueBefore(self.clock.now())
            .and(ReminderPredicate::Completed(false));
        self.fetch_reminders(Some(&predicate))
    }

    pub fn fetch_today_reminders(&self) -> Result<Vec<Reminder>, StorageError> {
        let (start, end) = clock::day_bounds(self.clock.now().date_naive());
        let predicate = ReminderPredicate::DueWithin { start, end }
            .and(ReminderPredicate::Completed(false));
        self.fetch_reminders(Some(&predicate))
    }

    pub fn fetch_reminder(&self, id: Uuid) -> Result<Option<Reminder>, StorageError> {
        self.query_reminder(id)
            .inspect_err(|err| warn!(error = %err, %id, "failed to fetch reminder"))
    }

    pub fn upsert_reminder(&mut self, reminder: &Reminder) -> Result<(), ValidationError> {
        reminder.validate()?;
        let due_date = match &reminder.due_date {
            Some(due) => Some(to_nanos(due).ok_or(ValidationError::TimestampOutOfRange)?),
            None => None,
        };
        self.pending.push(Change::UpsertReminder(ReminderRow {
            id: reminder.id().to_string(),
            title: reminder.title.clone(),
            notes: reminder.notes.clone(),
            due_date,
            priority: reminder.priority.as_i64(),
            is_completed: reminder.is_completed,
        }));
        Ok(())
    }

    pub fn delete_reminder(&mut self, id: Uuid) {
        self.pending.push(Change::DeleteReminder(id));
    }

    // ── Events ──

    pub fn fetch_events(
        &self,
        predicate: Option<&EventPredicate>,
    ) -> Result<Vec<CalendarEvent>, StorageError> {
        self.query_events(predicate)
            .inspect_err(|err| warn!(error = %err, "failed to fetch events"))
    }

    pub fn fetch_events_for_date(&self, date: NaiveDate) -> Result<Vec<CalendarEvent>, StorageError> {
        let (start, end) = clock::day_bounds(date);
        self.fetch_events(Some(&EventPredicate::StartsWithin { start, end }))
    }

    /// Events starting between now and `days` calendar days from now, both ends inclusive.
    /// A horizon past the end of time leaves the window open-ended.
    pub fn fetch_upcoming_events(&self, days: u32) -> Result<Vec<CalendarEvent>, StorageError> {
        let now = self.clock.now();
        let predicate = match clock::add_days(&now, days) {
            Some(horizon) => EventPredicate::StartsOnOrAfter(now)
                .and(EventPredicate::StartsOnOrBefore(horizon)),
            None => EventPredicate::StartsOnOrAfter(now),
        };
        self.fetch_events(Some(&predicate))
    }

    pub fn fetch_event(&self, id: Uuid) -> Result<Option<CalendarEvent>, StorageError> {
        self.query_event(id)
            .inspect_err(|err| warn!(error = %err, %id, "failed to fetch event"))
    }

    pub fn upsert_event(&mut self, event: &CalendarEvent) -> Result<(), ValidationError> {
        event.validate()?;
        let start_date = to_nanos(&event.start_date).ok_or(ValidationError::TimestampOutOfRange)?;
        let end_date = to_nanos(&event.end_date).ok_or(ValidationError::TimestampOutOfRange)?;
        self.pending.push(Change::UpsertEvent(EventRow {
            id: event.id().to_string(),
            title: event.title.clone(),
            start_date,
            end_date,
            is_all_day: event.is_all_day,
            location: event.location.clone(),
            notes: event.notes.clone(),
            display_color: event.display_color.clone(),
        }));
        Ok(())
    }

    pub fn delete_event(&mut self, id: Uuid) {
        self.pending.push(Change::DeleteEvent(id));
    }

    // ── Transactions ──

    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn discard_changes(&mut self) {
        self.pending.clear();
    }

    /// Write all staged changes atomically.
    ///
    /// On failure nothing is written and the staged changes are kept.
    pub fn save(&mut self) -> Result<(), StorageError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        match apply_changes(&mut self.conn, &self.pending) {
            Ok(()) => {
                debug!(changes = self.pending.len(), "saved store");
                self.pending.clear();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, changes = self.pending.len(), "failed to save store");
                Err(err)
            }
        }
    }

    fn query_reminders(
        &self,
        predicate: Option<&ReminderPredicate>,
    ) -> Result<Vec<Reminder>, StorageError> {
        let (clause, values) = where_clause(predicate);
        let sql = format!("SELECT {REMINDER_COLUMNS} FROM reminders{clause} {REMINDER_ORDER}");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;
        let mut reminders = Vec::new();
        while let Some(row) = rows.next()? {
            reminders.push(read_reminder(row)?);
        }
        Ok(reminders)
    }

    fn query_reminder(&self, id: Uuid) -> Result<Option<Reminder>, StorageError> {
        let sql = format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id.to_string()])?;
        let row = rows.next()?;
        row.map(read_reminder).transpose()
    }

    fn query_event(&self, id: Uuid) -> Result<Option<CalendarEvent>, StorageError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM calendar_events WHERE id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id.to_string()])?;
        let row = rows.next()?;
        row.map(read_event).transpose()
    }

    fn query_events(
        &self,
        predicate: Option<&EventPredicate>,
    ) -> Result<Vec<CalendarEvent>, StorageError> {
        let (clause, values) = where_clause(predicate);
        let sql = format!("SELECT {EVENT_COLUMNS} FROM calendar_events{clause} {EVENT_ORDER}");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(read_event(row)?);
        }
        Ok(events)
    }
}

fn apply_changes(conn: &mut Connection, changes: &[Change]) -> Result<(), StorageError> {
    let tx = conn.transaction()?;
    for change in changes {
        match change {
            Change::UpsertReminder(r) => {
                tx.execute(
                    "INSERT OR REPLACE INTO reminders (id, title, notes, due_date, priority, is_completed)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![r.id, r.title, r.notes, r.due_date, r.priority, r.is_completed],
                )?;
            }
            Change::DeleteReminder(id) => {
                tx.execute("DELETE FROM reminders WHERE id = ?1", params![id.to_string()])?;
            }
            Change::UpsertEvent(e) => {
                tx.execute(
                    "INSERT OR REPLACE INTO calendar_events
                     (id, title, start_date, end_date, is_all_day, location, notes, display_color)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        e.id,
                        e.title,
                        e.start_date,
                        e.end_date,
                        e.is_all_day,
                        e.location,
                        e.notes,
                        e.display_color
                    ],
                )?;
            }
            Change::DeleteEvent(id) => {
                tx.execute("DELETE FROM calendar_events WHERE id = ?1", params![id.to_string()])?;
            }
        }
    }
    tx.commit()?;
    Ok(())
}

fn where_clause<P: WriteSql>(predicate: Option<&P>) -> (String, Vec<Value>) {
    let mut sql = String::new();
    let mut values = Vec::new();
    if let Some(predicate) = predicate {
        sql.push_str(" WHERE ");
        predicate.write_sql(&mut sql, &mut values);
    }
    (sql, values)
}

fn corrupt(id: &str, reason: impl Into<String>) -> StorageError {
    StorageError::Corrupt {
        id: id.to_string(),
        reason: reason.into(),
    }
}

fn parse_id(id: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(id).map_err(|err| corrupt(id, err.to_string()))
}

fn decode_time(id: &str, nanos: i64) -> Result<DateTime<Local>, StorageError> {
    from_nanos(nanos).ok_or_else(|| corrupt(id, format!("invalid timestamp {nanos}")))
}

fn read_reminder(row: &Row<'_>) -> Result<Reminder, StorageError> {
    let raw_id: String = row.get(0)?;
    let id = parse_id(&raw_id)?;
    let due_date = match row.get::<_, Option<i64>>(3)? {
        Some(nanos) => Some(decode_time(&raw_id, nanos)?),
        None => None,
    };
    let raw_priority: i64 = row.get(4)?;
    let priority = Priority::from_i64(raw_priority)
        .ok_or_else(|| corrupt(&raw_id, format!("unknown priority {raw_priority}")))?;

    Ok(Reminder::from_parts(
        id,
        row.get(1)?,
        row.get(2)?,
        due_date,
        priority,
        row.get(5)?,
    ))
}

fn read_event(row: &Row<'_>) -> Result<CalendarEvent, StorageError> {
    let raw_id: String = row.get(0)?;
    let id = parse_id(&raw_id)?;
    let start_date = decode_time(&raw_id, row.get(2)?)?;
    let end_date = decode_time(&raw_id, row.get(3)?)?;

    Ok(CalendarEvent::from_parts(
        id,
        row.get(1)?,
        start_date,
        end_date,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}
