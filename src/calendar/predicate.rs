//! Typed filters over stored records, compiled to SQL `WHERE` fragments.

use chrono::{DateTime, Local, TimeZone};
use rusqlite::types::Value;

use super::reminder::Priority;

const NANOS_PER_SEC: i64 = 1_000_000_000;

pub(crate) fn to_nanos(dt: &DateTime<Local>) -> Option<i64> {
    dt.timestamp()
        .checked_mul(NANOS_PER_SEC)?
        .checked_add(i64::from(dt.timestamp_subsec_nanos()))
}

pub(crate) fn from_nanos(nanos: i64) -> Option<DateTime<Local>> {
    let secs = nanos.div_euclid(NANOS_PER_SEC);
    let subsec = nanos.rem_euclid(NANOS_PER_SEC) as u32;
    Local.timestamp_opt(secs, subsec).single()
}

/// Bound for comparisons; instants beyond the storable range clamp to its edges.
fn bound(dt: &DateTime<Local>) -> Value {
    let nanos = to_nanos(dt).unwrap_or(if dt.timestamp() < 0 { i64::MIN } else { i64::MAX });
    Value::Integer(nanos)
}

pub(crate) trait WriteSql {
    fn write_sql(&self, sql: &mut String, params: &mut Vec<Value>);
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReminderPredicate {
    DueBefore(DateTime<Local>),
    DueOnOrAfter(DateTime<Local>),
    /// `start <= due_date < end`
    DueWithin {
        start: DateTime<Local>,
        end: DateTime<Local>,
    },
    HasDueDate(bool),
    Completed(bool),
    Priority(Priority),
    TitleContains(String),
    And(Vec<ReminderPredicate>),
    Or(Vec<ReminderPredicate>),
}

impl ReminderPredicate {
    pub fn and(self, other: ReminderPredicate) -> Self {
        match self {
            ReminderPredicate::And(mut parts) => {
                parts.push(other);
                ReminderPredicate::And(parts)
            }
            first => ReminderPredicate::And(vec![first, other]),
        }
    }

    pub fn or(self, other: ReminderPredicate) -> Self {
        match self {
            ReminderPredicate::Or(mut parts) => {
                parts.push(other);
                ReminderPredicate::Or(parts)
            }
            first => ReminderPredicate::Or(vec![first, other]),
        }
    }
}

impl WriteSql for ReminderPredicate {
    fn write_sql(&self, sql: &mut String, params: &mut Vec<Value>) {
        match self {
            ReminderPredicate::DueBefore(t) => {
                sql.push_str("due_date < ?");
                params.push(bound(t));
            }
            ReminderPredicate::DueOnOrAfter(t) => {
                sql.push_str("due_date >= ?");
                params.push(bound(t));
            }
            ReminderPredicate::DueWithin { start, end } => {
                sql.push_str("(due_date >= ? AND due_date < ?)");
                params.push(bound(start));
                params.push(bound(end));
            }
            ReminderPredicate::HasDueDate(true) => sql.push_str("due_date IS NOT NULL"),
            ReminderPredicate::HasDueDate(false) => sql.push_str("due_date IS NULL"),
            ReminderPredicate::Completed(done) => {
                sql.push_str("is_completed = ?");
                params.push(Value::Integer(i64::from(*done)));
            }
            ReminderPredicate::Priority(p) => {
                sql.push_str("priority = ?");
                params.push(Value::Integer(p.as_i64()));
            }
            ReminderPredicate::TitleContains(needle) => {
                sql.push_str("instr(lower(title), lower(?)) > 0");
                params.push(Value::Text(needle.clone()));
            }
            ReminderPredicate::And(parts) => write_group(parts, " AND ", "1", sql, params),
            ReminderPredicate::Or(parts) => write_group(parts, " OR ", "0", sql, params),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventPredicate {
    StartsBefore(DateTime<Local>),
    StartsOnOrAfter(DateTime<Local>),
    StartsOnOrBefore(DateTime<Local>),
    /// `start <= start_date < end`
    StartsWithin {
        start: DateTime<Local>,
        end: DateTime<Local>,
    },
    /// Events intersecting `[start, end)`.
    Overlaps {
        start: DateTime<Local>,
        end: DateTime<Local>,
    },
    AllDay(bool),
    And(Vec<EventPredicate>),
    Or(Vec<EventPredicate>),
}

impl EventPredicate {
    pub fn and(self, other: EventPredicate) -> Self {
        match self {
            EventPredicate::And(mut parts) => {
                parts.push(other);
                EventPredicate::And(parts)
            }
            first => EventPredicate::And(vec![first, other]),
        }
    }

    pub fn or(self, other: EventPredicate) -> Self {
        match self {
            EventPredicate::Or(mut parts) => {
                parts.push(other);
                EventPredicate::Or(parts)
            }
            first => EventPredicate::Or(vec![first, other]),
        }
    }
}

impl WriteSql for EventPredicate {
    fn write_sql(&self, sql: &mut String, params: &mut Vec<Value>) {
        match self {
            EventPredicate::StartsBefore(t) => {
                sql.push_str("start_date < ?");
                params.push(bound(t));
            }
            EventPredicate::StartsOnOrAfter(t) => {
                sql.push_str("start_date >= ?");
                params.push(bound(t));
            }
            EventPredicate::StartsOnOrBefore(t) => {
                sql.push_str("start_date <= ?");
                params.push(bound(t));
            }
            EventPredicate::StartsWithin { start, end } => {
                sql.push_str("(start_date >= ? AND start_date < ?)");
                params.push(bound(start));
                params.push(bound(end));
            }
            EventPredicate::Overlaps { start, end } => {
                sql.push_str("(start_date < ? AND end_date >= ?)");
                params.push(bound(end));
                params.push(bound(start));
            }
            EventPredicate::AllDay(flag) => {
                sql.push_str("is_all_day = ?");
                params.push(Value::Integer(i64::from(*flag)));
            }
            EventPredicate::And(parts) => write_group(parts, " AND ", "1", sql, params),
            EventPredicate::Or(parts) => write_group(parts, " OR ", "0", sql, params),
        }
    }
}

/// An empty group is the identity of its operator: `1` for AND, `0` for OR.
fn write_group<P: WriteSql>(
    parts: &[P],
    joiner: &str,
    empty: &str,
    sql: &mut String,
    params: &mut Vec<Value>,
) {
    if parts.is_empty() {
        sql.push_str(empty);
        return;
    }
    sql.push('(');
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            sql.push_str(joiner);
        }
        part.write_sql(sql, params);
    }
    sql.push(')');
}
