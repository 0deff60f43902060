//! Planner ICS Core Library
//!
//! Turns text pasted from a university schedule planner page into structured
//! courses, and courses plus a semester date range into an ICS calendar with
//! one event per class meeting.

pub mod days;
pub mod error;
pub mod ics;
pub mod parser;
pub mod recurrence;
pub mod transport;
pub mod types;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        ics::{IcsGenerator, generate_ics},
        parser::{ScheduleTextParser, parse_schedule},
        recurrence::{Occurrence, RecurrenceExpander},
        transport::*,
        types::*,
    };
}
