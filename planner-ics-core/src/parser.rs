use std::sync::LazyLock;

use regex::Regex;

use crate::{Course, Schedule};

/// Line-level marker that opens every course entry
pub const SEGMENT_MARKER: &str = "Enrolled";

/// `H:MM` with a mandatory meridiem, hour 1-12
const TIME: &str = r"(?:1[0-2]|0?[1-9]):[0-5][0-9][ap]m";
/// Day-code run, multi-character codes first
const DAYS: &str = r"(?:Th|Tu|Sa|Su|[MTWRF])+";

/// `29901  Industrial Eng & Ops Rsch<TAB>215`
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s+([A-Za-z\s&]+?)\t+(\w+)").expect("header pattern is valid")
});

/// `MW 12:00pm - 12:59pm - Latimer 120`
static SCHEDULE_WITH_LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b({DAYS})\s+({TIME})\s*-\s*({TIME})\s+-\s+(.+?)\s*$"
    ))
    .expect("schedule pattern is valid")
});

/// `MW 12:00pm - 12:59pm`
static SCHEDULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b({DAYS})\s+({TIME})\s*-\s*({TIME})"))
        .expect("schedule pattern is valid")
});

/// Two or three capitalized words and nothing else
static INSTRUCTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2}$")
        .expect("instructor pattern is valid")
});

/// Recovers enrolled courses from text pasted out of the schedule planner page.
///
/// The parser never fails: text without any `Enrolled` marker yields no
/// courses, and a segment whose lines match nothing still yields a course with
/// empty fields so partial extraction stays visible to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleTextParser;

impl ScheduleTextParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse the whole pasted page
    pub fn parse(&self, text: &str) -> Vec<Course> {
        // everything before the first marker is page chrome
        let courses: Vec<Course> = text
            .split(SEGMENT_MARKER)
            .skip(1)
            .map(|segment| self.parse_segment(segment))
            .collect();

        tracing::debug!(
            "Parsed {} course segments, {} with a meeting pattern",
            courses.len(),
            courses.iter().filter(|c| c.has_schedule()).count()
        );

        courses
    }

    /// Parse the text between two markers
    pub fn parse_segment(&self, segment: &str) -> Course {
        let mut course = Course::default();
        let body = segment.trim();

        if let Some(caps) = body.lines().next().and_then(|l| HEADER_RE.captures(l)) {
            course.id = caps[1].to_string();
            course.name = caps[2].trim().to_string();
            course.number = caps[3].to_string();
        }

        let mut schedule_found = false;
        for line in body.lines().map(str::trim) {
            if let Some(caps) = SCHEDULE_WITH_LOCATION_RE.captures(line) {
                if !schedule_found {
                    course.schedule = schedule_from(&caps[1], &caps[2], &caps[3]);
                    course.location = caps[4].to_string();
                    schedule_found = true;
                }
                continue;
            }

            if let Some(caps) = SCHEDULE_RE.captures(line) {
                if !schedule_found {
                    course.schedule = schedule_from(&caps[1], &caps[2], &caps[3]);
                    schedule_found = true;
                }
                continue;
            }

            if INSTRUCTOR_RE.is_match(line) {
                course.instructor.push(collapse_whitespace(line));
            }
        }

        if course.id.is_empty() {
            tracing::debug!(
                "Segment header not recognized: {:?}",
                body.lines().next().unwrap_or_default()
            );
        }

        course
    }
}

/// Convenience wrapper around [`ScheduleTextParser::parse`]
pub fn parse_schedule(text: &str) -> Vec<Course> {
    ScheduleTextParser::new().parse(text)
}

fn schedule_from(days: &str, start: &str, end: &str) -> Schedule {
    Schedule {
        start_time: start.to_string(),
        end_time: end.to_string(),
        days: days.to_string(),
    }
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}
