//! Events command for listing a group's events.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use evst_core::{EventStatus, GroupId};
use evst_db::Database;

use super::util::format_datetime;

/// Lists every event of `group`, each classified on its own at `now`.
///
/// The last line is the event `status` reports on.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    group: &GroupId,
    now: DateTime<Utc>,
) -> Result<()> {
    let events = db.list_events(group.as_str())?;

    if events.is_empty() {
        writeln!(writer, "No events recorded for {group}.")?;
        return Ok(());
    }

    writeln!(writer, "Events for {group} at {}:", format_datetime(now))?;
    let last = events.len() - 1;
    for (i, event) in events.iter().enumerate() {
        let descriptor = event.descriptor();
        let status = EventStatus::classify(Some(&descriptor), now);
        writeln!(
            writer,
            "- {}: ends {}, review until {}, {status}{}",
            event.id,
            format_datetime(descriptor.end_date),
            format_datetime(descriptor.review_deadline()),
            if i == last { " (latest)" } else { "" },
        )?;
    }

    Ok(())
}
