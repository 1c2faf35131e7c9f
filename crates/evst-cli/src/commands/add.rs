//! Add command for recording an event.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use evst_core::GroupId;
use evst_db::{Database, EventRecord};
use uuid::Uuid;

/// Stores a new event for `group`.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    group: &GroupId,
    end_date: DateTime<Utc>,
    review_duration_in_hours: f64,
    id: Option<String>,
) -> Result<()> {
    let event = EventRecord {
        id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        group_id: group.to_string(),
        end_date,
        review_duration_in_hours,
    };

    if db.insert_event(&event)? {
        writeln!(writer, "Recorded event {} for {group}", event.id)?;
    } else {
        writeln!(writer, "Event {} already exists, not modified", event.id)?;
    }

    Ok(())
}
