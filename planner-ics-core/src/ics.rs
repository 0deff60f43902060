use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    Course, IcsOptions, InvalidTimePolicy, Result, Semester,
    recurrence::{Occurrence, RecurrenceExpander},
};


/// Product identifier written into every calendar
pub const PRODID: &str = "-//Schedule Planner ICS//Course Calendar//EN";

/// Floating local time, no `Z` suffix and no TZID
const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// ICS calendar generator: one VCALENDAR document, one VEVENT per occurrence
pub struct IcsGenerator {
    options: IcsOptions,
}

impl IcsGenerator {
    pub fn new(options: IcsOptions) -> Self {
        Self { options }
    }

    /// Generate the ICS document for `courses` over `semester`
    pub fn generate(&self, courses: &[Course], semester: &Semester) -> Result<String> {
        let expander = RecurrenceExpander::new(*semester);
        let mut ics_content = String::new();
        let mut event_count = 0usize;

        // header
        ics_content.push_str("BEGIN:VCALENDAR\r\n");
        ics_content.push_str("VERSION:2.0\r\n");
        ics_content.push_str(&format!("PRODID:{}\r\n", PRODID));
        ics_content.push_str("CALSCALE:GREGORIAN\r\n");
        ics_content.push_str("METHOD:PUBLISH\r\n");

        for course in courses {
            let occurrences = match expander.expand(course) {
                Ok(occurrences) => occurrences,
                Err(err) => match self.options.on_invalid_time {
                    InvalidTimePolicy::Abort => return Err(err),
                    InvalidTimePolicy::SkipCourse => {
                        tracing::warn!("Skipping course without usable times: {}", err);
                        continue;
                    }
                },
            };

            for occurrence in &occurrences {
                self.add_course_event(&mut ics_content, course, occurrence);
            }
            event_count += occurrences.len();
        }

        // footer
        ics_content.push_str("END:VCALENDAR\r\n");

        tracing::debug!(
            "Generated {} events for {} courses ({} to {})",
            event_count,
            courses.len(),
            semester.start_date,
            semester.end_date
        );

        Ok(ics_content)
    }

    /// Append a single occurrence as a VEVENT
    fn add_course_event(&self, ics_content: &mut String, course: &Course, occurrence: &Occurrence) {
        let uid = Uuid::new_v4().to_string();

        ics_content.push_str("BEGIN:VEVENT\r\n");
        ics_content.push_str(&format!("UID:{}\r\n", uid));
        ics_content.push_str(&format!("DTSTART:{}\r\n", format_floating(occurrence.start)));
        ics_content.push_str(&format!("DTEND:{}\r\n", format_floating(occurrence.end)));
        ics_content.push_str(&format!(
            "SUMMARY:{}\r\n",
            self.escape_text(&self.build_course_title(course))
        ));
        ics_content.push_str(&format!("LOCATION:{}\r\n", course.location));
        ics_content.push_str(&format!(
            "DESCRIPTION:{}\r\n",
            self.escape_text(&self.build_course_description(course))
        ));
        ics_content.push_str("END:VEVENT\r\n");
    }

    /// Escape TEXT values (RFC 5545 3.3.11)
    fn escape_text(&self, text: &str) -> String {
        text.replace('\\', "\\\\")
            .replace("\r\n", "\\n")
            .replace('\n', "\\n")
            .replace('\r', "\\n")
            .replace(',', "\\,")
            .replace(';', "\\;")
    }

    /// `Industrial Eng & Ops Rsch - 215`
    pub fn build_course_title(&self, course: &Course) -> String {
        format!("{} - {}", course.name, course.number)
    }

    /// Instructors one per line, then the course number
    pub fn build_course_description(&self, course: &Course) -> String {
        format!(
            "Instructor: {}\nCourse: {}",
            course.instructor.join("\n"),
            course.number
        )
    }
}

impl Default for IcsGenerator {
    fn default() -> Self {
        Self::new(IcsOptions::default())
    }
}

fn format_floating(date_time: NaiveDateTime) -> String {
    date_time.format(DATE_TIME_FORMAT).to_string()
}

/// Parse both semester dates and generate with default options
pub fn generate_ics(courses: &[Course], semester_start: &str, semester_end: &str) -> Result<String> {
    let semester = Semester::from_date_strs(semester_start, semester_end)?;
    IcsGenerator::default().generate(courses, &semester)
}
