//! Event lifecycle status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::EventDescriptor;

/// Where an event sits in its lifecycle at a given instant.
///
/// Time is split into three contiguous intervals:
///
/// | `now`                                   | status     |
/// |-----------------------------------------|------------|
/// | `now <= end_date`                       | `active`   |
/// | `end_date < now <= end_date + review`   | `inReview` |
/// | `now > end_date + review`, or no event  | `done`     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventStatus {
    /// The event has not ended yet.
    Active,
    /// The event has ended and is inside its review window.
    InReview,
    /// The review window has passed, or there is no event at all.
    Done,
}

impl EventStatus {
    /// Classifies an optional event against `now`.
    pub fn classify(event: Option<&EventDescriptor>, now: DateTime<Utc>) -> Self {
        let Some(event) = event else {
            return Self::Done;
        };
        if event.end_date >= now {
            return Self::Active;
        }
        if event.review_deadline() >= now {
            Self::InReview
        } else {
            Self::Done
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::InReview => "inReview",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
