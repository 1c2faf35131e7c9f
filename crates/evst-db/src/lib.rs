//! Storage layer for event status.
//!
//! Persists events per group using `rusqlite` and serves the latest one to
//! the status checker through [`LoadLastEventRepository`].
//!
//! # Thread Safety
//!
//! `rusqlite::Connection` is `Send` but not `Sync`. [`Database`] keeps it
//! behind a `Mutex` so it can be shared with async callers. The lock is only
//! held for the duration of a single statement and never across an `.await`.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 UTC with millisecond precision
//! (e.g., `2025-01-15T10:30:00.000Z`). The fixed width keeps lexicographic
//! ordering equal to chronological ordering, which `last_event` relies on.
//! That only holds for four-digit years, so end dates outside 0000-9999 are
//! rejected on insert. Sub-millisecond precision is dropped on write.
//!
//! ## Review Duration
//!
//! SQLite has no NaN: rusqlite binds it as NULL. A NaN review duration is
//! stored as `0.0`, which is how the classifier reads it anyway.
//!
//! ## Latest Event
//!
//! The "last" event of a group is the one with the greatest `end_date`.
//! When several share it, the most recently inserted row wins.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use evst_core::{EventDescriptor, GroupId, LoadLastEventRepository};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for event {event_id}: {timestamp}")]
    TimestampParse {
        event_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// The end date cannot be stored with a four-digit year.
    #[error("end date out of range for event {event_id}: {end_date}")]
    EndDateOutOfRange {
        event_id: String,
        end_date: DateTime<Utc>,
    },
    /// Another thread panicked while holding the connection.
    #[error("database connection lock poisoned")]
    LockPoisoned,
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Mutex<Connection>,
}

/// An event as stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: String,
    pub group_id: String,
    pub end_date: DateTime<Utc>,
    pub review_duration_in_hours: f64,
}

impl EventRecord {
    /// The fields the status classifier needs.
    pub const fn descriptor(&self) -> EventDescriptor {
        EventDescriptor::new(self.end_date, self.review_duration_in_hours)
    }
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        Self::init(Connection::open(path)?)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(conn: Connection) -> Result<Self, DbError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                group_id TEXT NOT NULL,
                end_date TEXT NOT NULL,
                review_duration_in_hours REAL NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_events_group_end
                ON events (group_id, end_date);
            ",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Inserts an event, ignoring duplicates by ID.
    ///
    /// Returns `true` if a new row was written. Any failure other than an ID
    /// conflict is returned as an error.
    pub fn insert_event(&self, event: &EventRecord) -> Result<bool, DbError> {
        if !(0..=9999).contains(&event.end_date.year()) {
            return Err(DbError::EndDateOutOfRange {
                event_id: event.id.clone(),
                end_date: event.end_date,
            });
        }
        let review_duration_in_hours = if event.review_duration_in_hours.is_nan() {
            0.0
        } else {
            event.review_duration_in_hours
        };

        let written = self.conn()?.execute(
            "
            INSERT INTO events (
                id, group_id, end_date, review_duration_in_hours, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO NOTHING
            ",
            params![
                event.id,
                event.group_id,
                format_timestamp(event.end_date),
                review_duration_in_hours,
                format_timestamp(Utc::now()),
            ],
        )?;
        tracing::debug!(
            event_id = %event.id,
            group_id = %event.group_id,
            written = written > 0,
            "insert event"
        );
        Ok(written > 0)
    }

    /// Lists a group's events, ordered by end date then insertion order.
    pub fn list_events(&self, group_id: &str) -> Result<Vec<EventRecord>, DbError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "
            SELECT id, group_id, end_date, review_duration_in_hours
            FROM events
            WHERE group_id = ?1
            ORDER BY end_date ASC, rowid ASC
            ",
        )?;
        let rows = stmt.query_map([group_id], read_row)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?.into_record()?);
        }
        Ok(events)
    }

    /// Returns the group's latest event, if any.
    pub fn last_event(&self, group_id: &str) -> Result<Option<EventRecord>, DbError> {
        let row = self
            .conn()?
            .query_row(
                "
                SELECT id, group_id, end_date, review_duration_in_hours
                FROM events
                WHERE group_id = ?1
                ORDER BY end_date DESC, rowid DESC
                LIMIT 1
                ",
                [group_id],
                read_row,
            )
            .optional()?;
        row.map(RawEvent::into_record).transpose()
    }
}

#[async_trait]
impl LoadLastEventRepository for Database {
    type Error = DbError;

    async fn load_last_event(
        &self,
        group_id: &GroupId,
    ) -> Result<Option<EventDescriptor>, Self::Error> {
        let event = self.last_event(group_id.as_str())?;
        tracing::debug!(%group_id, found = event.is_some(), "loaded last event");
        Ok(event.as_ref().map(EventRecord::descriptor))
    }
}

/// A row before its timestamp is parsed.
struct RawEvent {
    id: String,
    group_id: String,
    end_date: String,
    review_duration_in_hours: f64,
}

impl RawEvent {
    fn into_record(self) -> Result<EventRecord, DbError> {
        let end_date = parse_timestamp(&self.end_date, &self.id)?;
        Ok(EventRecord {
            id: self.id,
            group_id: self.group_id,
            end_date,
            review_duration_in_hours: self.review_duration_in_hours,
        })
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvent> {
    Ok(RawEvent {
        id: row.get(0)?,
        group_id: row.get(1)?,
        end_date: row.get(2)?,
        review_duration_in_hours: row.get(3)?,
    })
}

fn parse_timestamp(timestamp: &str, event_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            event_id: event_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
