//! Classify command for checking an ad-hoc event.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use evst_core::{EventDescriptor, EventStatus};
use serde::Serialize;

use super::util::format_datetime;

#[derive(Serialize)]
struct ClassifyOutput {
    event: EventDescriptor,
    #[serde(rename = "reviewDeadline")]
    review_deadline: DateTime<Utc>,
    status: EventStatus,
}

pub fn run<W: Write>(
    writer: &mut W,
    event: EventDescriptor,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let status = EventStatus::classify(Some(&event), now);

    if json {
        let output = ClassifyOutput {
            event,
            review_deadline: event.review_deadline(),
            status,
        };
        writeln!(writer, "{}", serde_json::to_string(&output)?)?;
        return Ok(());
    }

    writeln!(writer, "status: {status}")?;
    writeln!(writer, "ends: {}", format_datetime(event.end_date))?;
    writeln!(
        writer,
        "review until: {}",
        format_datetime(event.review_deadline())
    )?;
    Ok(())
}
