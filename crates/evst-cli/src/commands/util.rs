//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:in\s+(\d+)\s+(second|minute|hour|day|week)s?|(\d+)\s+(second|minute|hour|day|week)s?\s+ago)$")
        .unwrap()
});

/// Conservative bounds for relative time parsing (~1000 years in seconds).
const MAX_RELATIVE_SECONDS: i64 = 1000 * 365 * 24 * 60 * 60;

/// Parse a datetime string as ISO 8601, `now`, or a time relative to `now`.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Past: "2 hours ago", "30 minutes ago", "1 day ago"
/// - Future: "in 2 hours", "in 1 week"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if s == "now" {
        return Ok(now);
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '2 hours ago', 'in 30 minutes')"
        );
    };

    let (n, unit, sign) = match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
        (Some(n), Some(unit), _, _) => (n.as_str(), unit.as_str(), 1),
        (_, _, Some(n), Some(unit)) => (n.as_str(), unit.as_str(), -1),
        _ => anyhow::bail!("Invalid datetime: {s}"),
    };

    let n: i64 = n
        .parse()
        .context("failed to parse number in relative time")?;

    let seconds_per_unit = match unit {
        "second" => 1,
        "minute" => 60,
        "hour" => 60 * 60,
        "day" => 60 * 60 * 24,
        "week" => 60 * 60 * 24 * 7,
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > MAX_RELATIVE_SECONDS / seconds_per_unit {
        anyhow::bail!("Relative time value too large: {n} {unit}");
    }

    Ok(now + Duration::seconds(sign * n * seconds_per_unit))
}

/// Formats a timestamp for display, omitting zero fractional seconds.
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn parses_rfc3339() {
        let dt = parse_datetime("2026-01-15T12:30:00+02:00", now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn parses_now() {
        assert_eq!(parse_datetime("now", now()).unwrap(), now());
    }

    #[test]
    fn parses_past_relative_times() {
        assert_eq!(
            parse_datetime("2 hours ago", now()).unwrap(),
            now() - Duration::hours(2)
        );
        assert_eq!(
            parse_datetime("1 minute ago", now()).unwrap(),
            now() - Duration::minutes(1)
        );
    }

    #[test]
    fn parses_future_relative_times() {
        assert_eq!(
            parse_datetime("in 3 days", now()).unwrap(),
            now() + Duration::days(3)
        );
        assert_eq!(
            parse_datetime("in 1 week", now()).unwrap(),
            now() + Duration::weeks(1)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("yesterday", now()).is_err());
        assert!(parse_datetime("in 2 fortnights", now()).is_err());
        assert!(parse_datetime("2 hours", now()).is_err());
    }

    #[test]
    fn rejects_values_out_of_range() {
        assert!(parse_datetime("999999999 weeks ago", now()).is_err());
    }

    #[test]
    fn formats_without_zero_fraction() {
        assert_eq!(format_datetime(now()), "2026-01-15T10:00:00Z");
        assert_eq!(
            format_datetime(now() + Duration::milliseconds(250)),
            "2026-01-15T10:00:00.250Z"
        );
    }
}
