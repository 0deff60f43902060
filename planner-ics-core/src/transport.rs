//! JSON transport of parsed courses between the parse step and the calendar
//! step.
//!
//! Course lists are decoded entry by entry so that a malformed record is
//! reported with its position instead of failing the whole batch opaquely.

use serde::{Deserialize, de::Error as _};
use serde_json::Value;

use crate::{Course, Error, Result, ScheduleExport};

/// Either a bare course list or a full export envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A bare JSON array of courses
    Courses(Vec<Course>),
    /// An object carrying the courses and semester dates
    Export(ScheduleExport),
}

impl Payload {
    pub fn courses(&self) -> &[Course] {
        match self {
            Self::Courses(courses) => courses,
            Self::Export(export) => &export.courses,
        }
    }
}

#[derive(Deserialize)]
struct RawExport {
    courses: Vec<Value>,
    semester_start: String,
    semester_end: String,
}

pub fn courses_to_json(courses: &[Course]) -> Result<String> {
    Ok(serde_json::to_string_pretty(courses)?)
}

pub fn export_to_json(export: &ScheduleExport) -> Result<String> {
    Ok(serde_json::to_string_pretty(export)?)
}

/// Decode a JSON array of courses
pub fn courses_from_json(json: &str) -> Result<Vec<Course>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    courses_from_values(values)
}

/// Decode a JSON export envelope
pub fn export_from_json(json: &str) -> Result<ScheduleExport> {
    let raw: RawExport = serde_json::from_str(json)?;
    export_from_raw(raw)
}

/// Decode either a course array or an export envelope
pub fn payload_from_json(json: &str) -> Result<Payload> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(values) => Ok(Payload::Courses(courses_from_values(values)?)),
        value @ Value::Object(_) => {
            let raw: RawExport = serde_json::from_value(value)?;
            Ok(Payload::Export(export_from_raw(raw)?))
        }
        _ => Err(Error::Json(serde_json::Error::custom(
            "expected a course array or an export object",
        ))),
    }
}

fn export_from_raw(raw: RawExport) -> Result<ScheduleExport> {
    Ok(ScheduleExport {
        courses: courses_from_values(raw.courses)?,
        semester_start: raw.semester_start,
        semester_end: raw.semester_end,
    })
}

fn courses_from_values(values: Vec<Value>) -> Result<Vec<Course>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|source| Error::InvalidCourse { index, source })
        })
        .collect()
}
