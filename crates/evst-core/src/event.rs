//! Time-bounded events with a trailing review window.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// The part of an event that status classification looks at.
///
/// An event is open until `end_date`, then stays in review for
/// `review_duration_in_hours` before it is final. The duration is not
/// validated: zero or negative values simply leave no review window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescriptor {
    /// When the event stops accepting input.
    pub end_date: DateTime<Utc>,
    /// Length of the review window after `end_date`, in hours.
    pub review_duration_in_hours: f64,
}

impl EventDescriptor {
    pub const fn new(end_date: DateTime<Utc>, review_duration_in_hours: f64) -> Self {
        Self {
            end_date,
            review_duration_in_hours,
        }
    }

    /// The review window as a duration, truncated to whole milliseconds.
    ///
    /// NaN reads as zero and out-of-range values saturate.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float-to-int casts saturate, which is the behavior we want"
    )]
    pub fn review_duration(&self) -> TimeDelta {
        let millis = (self.review_duration_in_hours * MILLIS_PER_HOUR) as i64;
        TimeDelta::try_milliseconds(millis).unwrap_or(if millis < 0 {
            TimeDelta::MIN
        } else {
            TimeDelta::MAX
        })
    }

    /// The last instant at which the event still counts as in review.
    ///
    /// Saturates at the representable range instead of turning invalid, so an
    /// event with an effectively unbounded review window stays in review
    /// rather than reading as done.
    #[must_use]
    pub fn review_deadline(&self) -> DateTime<Utc> {
        let duration = self.review_duration();
        self.end_date
            .checked_add_signed(duration)
            .unwrap_or(if duration < TimeDelta::zero() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            })
    }
}
