use thiserror::Error;

/// Errors raised by the core library
#[derive(Error, Debug)]
pub enum Error {
    /// The JSON document itself is malformed or has the wrong shape
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// One entry of a course list failed to decode
    #[error("Invalid course at index {index}: {source}")]
    InvalidCourse {
        /// Position in the input array
        index: usize,
        /// Decoder failure for that entry
        #[source]
        source: serde_json::Error,
    },

    /// A semester date is not `YYYY-MM-DD`
    #[error("Invalid date '{value}': {source}. Expected format: YYYY-MM-DD")]
    InvalidDate {
        /// The trimmed input
        value: String,
        /// Chrono's reason
        #[source]
        source: chrono::ParseError,
    },

    /// A time token matches neither `H:MMam` nor `Ham`
    #[error("Invalid time '{value}' for course {course}")]
    InvalidTime {
        /// Label of the offending course
        course: String,
        /// The token as given
        value: String,
    },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
