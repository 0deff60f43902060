use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Weekly meeting pattern of a course
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Start time token, e.g. `12:00pm`
    pub start_time: String,
    /// End time token, e.g. `12:59pm`
    pub end_time: String,
    /// Concatenated day-codes, e.g. `MW` or `TTh`
    pub days: String,
}

/// One enrolled course entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Enrollment/class number
    #[serde(deserialize_with = "de_string_or_int")]
    pub id: String,
    /// Subject/department label
    pub name: String,
    /// Course number, may contain letters (`242A`)
    #[serde(deserialize_with = "de_string_or_int")]
    pub number: String,
    /// Room, empty when the source had none
    pub location: String,
    /// Weekly meeting pattern, empty when none was found
    pub schedule: Schedule,
    /// Instructor full names in encounter order
    pub instructor: Vec<String>,
}

impl Course {
    /// Whether a meeting pattern was recovered for this course
    pub fn has_schedule(&self) -> bool {
        !self.schedule.days.is_empty()
    }

    /// Short human label used in log lines and errors
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.name, self.number, self.id)
    }
}

/// Earlier producers emitted `id`/`number` as integers.
fn de_string_or_int<'de, D>(de: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
    }

    Ok(match StringOrInt::deserialize(de)? {
        StringOrInt::String(s) => s,
        StringOrInt::Int(n) => n.to_string(),
    })
}

/// Semester date range, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semester {
    /// First day of classes
    pub start_date: NaiveDate,
    /// Last day of classes
    pub end_date: NaiveDate,
}

impl Semester {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Build a semester from two `YYYY-MM-DD` strings.
    ///
    /// An end date before the start date is accepted; it simply yields no
    /// occurrences.
    pub fn from_date_strs(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(parse_date(start)?, parse_date(end)?))
    }

    /// Whether `date` falls inside the semester
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|source| Error::InvalidDate {
        value: trimmed.to_string(),
        source,
    })
}

/// What to do with a course whose time tokens cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidTimePolicy {
    /// Drop that course's events, keep the rest of the document
    #[default]
    SkipCourse,
    /// Fail the whole generation
    Abort,
}

/// ICS generation options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IcsOptions {
    /// Policy for unreadable time tokens
    #[serde(default)]
    pub on_invalid_time: InvalidTimePolicy,
}

/// Courses plus the semester they should be expanded over, as exchanged
/// between the parse step and the calendar step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExport {
    /// Parsed courses
    pub courses: Vec<Course>,
    /// `YYYY-MM-DD`
    pub semester_start: String,
    /// `YYYY-MM-DD`
    pub semester_end: String,
}

impl ScheduleExport {
    /// Validate the carried dates
    pub fn semester(&self) -> Result<Semester> {
        Semester::from_date_strs(&self.semester_start, &self.semester_end)
    }
}
