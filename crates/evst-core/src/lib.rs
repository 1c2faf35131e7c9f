//! Core domain logic for event status.
//!
//! This crate contains:
//! - Classification: mapping an event's end date and review window to a status
//! - Checking: loading a group's latest event and classifying it
//! - Clocks: injectable time sources for deterministic checks

pub mod check;
pub mod clock;
pub mod event;
pub mod status;
pub mod types;

pub use check::{CheckLastEventStatus, LoadLastEventRepository};
pub use clock::{Clock, FixedClock, SystemClock};
pub use event::EventDescriptor;
pub use status::EventStatus;
pub use types::{GroupId, ValidationError};
