//! Status command for reporting a group's current event status.

use std::io::Write;

use anyhow::{Context, Result};
use evst_core::{CheckLastEventStatus, Clock, EventStatus, GroupId};
use evst_db::Database;
use serde::Serialize;

#[derive(Serialize)]
struct StatusOutput<'a> {
    group: &'a GroupId,
    status: EventStatus,
}

/// Checks the latest event of `group` against `clock`.
pub async fn run<W: Write, C: Clock>(
    writer: &mut W,
    db: &Database,
    clock: C,
    group: &GroupId,
    json: bool,
) -> Result<()> {
    let check = CheckLastEventStatus::with_clock(db, clock);
    let status = check
        .perform(group)
        .await
        .with_context(|| format!("failed to load last event for {group}"))?;
    tracing::debug!(%group, %status, "checked status");

    if json {
        let output = StatusOutput { group, status };
        writeln!(writer, "{}", serde_json::to_string(&output)?)?;
    } else {
        writeln!(writer, "{group}: {status}")?;
    }

    Ok(())
}
