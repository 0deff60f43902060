use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use planner_ics_core::prelude::*;

/// Parameters of the parse command
pub struct ParseParams {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Parameters of the generate command
pub struct GenerateParams {
    pub input: PathBuf,
    pub start: Option<String>,
    pub end: Option<String>,
    pub output: Option<PathBuf>,
    pub strict_times: bool,
}

/// Parameters of the convert command
pub struct ConvertParams {
    pub input: PathBuf,
    pub start: String,
    pub end: String,
    pub output: Option<PathBuf>,
    pub strict_times: bool,
}

/// Pasted text -> course JSON
pub fn parse_command(params: ParseParams) -> Result<()> {
    let text = read_input(&params.input)?;
    let courses = parse_courses(&text, &params.input);

    let json = match (params.start, params.end) {
        (Some(semester_start), Some(semester_end)) => {
            let export = ScheduleExport {
                courses,
                semester_start,
                semester_end,
            };
            export.semester()?;
            export_to_json(&export)?
        }
        _ => courses_to_json(&courses)?,
    };

    write_output(params.output.as_deref(), &json)
}

/// Course JSON -> ICS
pub fn generate_command(params: GenerateParams) -> Result<()> {
    let json = read_input(&params.input)?;
    let payload = payload_from_json(&json)
        .with_context(|| format!("Invalid course JSON in {}", params.input.display()))?;

    let semester = resolve_semester(&payload, params.start, params.end)?;
    tracing::info!(
        "Loaded {} courses, semester {} to {}",
        payload.courses().len(),
        semester.start_date,
        semester.end_date
    );

    render(
        payload.courses(),
        &semester,
        params.strict_times,
        params.output.as_deref(),
    )
}

/// Pasted text -> ICS
pub fn convert_command(params: ConvertParams) -> Result<()> {
    let semester = Semester::from_date_strs(&params.start, &params.end)?;
    let text = read_input(&params.input)?;
    let courses = parse_courses(&text, &params.input);

    render(
        &courses,
        &semester,
        params.strict_times,
        params.output.as_deref(),
    )
}

fn parse_courses(text: &str, source: &Path) -> Vec<Course> {
    let courses = ScheduleTextParser::new().parse(text);

    tracing::info!("Found {} enrolled courses in {}", courses.len(), source.display());
    for course in courses.iter().filter(|c| !c.has_schedule()) {
        tracing::warn!("No meeting pattern found for {}", course.label());
    }

    courses
}

/// Command-line dates win over the envelope's; each end is resolved on its own.
fn resolve_semester(
    payload: &Payload,
    start: Option<String>,
    end: Option<String>,
) -> Result<Semester> {
    let (envelope_start, envelope_end) = match payload {
        Payload::Export(export) => (
            Some(export.semester_start.as_str()),
            Some(export.semester_end.as_str()),
        ),
        Payload::Courses(_) => (None, None),
    };

    let start = start
        .as_deref()
        .or(envelope_start)
        .context("Semester start date is required (--start or semester_start)")?;
    let end = end
        .as_deref()
        .or(envelope_end)
        .context("Semester end date is required (--end or semester_end)")?;

    Ok(Semester::from_date_strs(start, end)?)
}

fn render(
    courses: &[Course],
    semester: &Semester,
    strict_times: bool,
    output: Option<&Path>,
) -> Result<()> {
    let options = IcsOptions {
        on_invalid_time: if strict_times {
            InvalidTimePolicy::Abort
        } else {
            InvalidTimePolicy::SkipCourse
        },
    };

    let ics_content = IcsGenerator::new(options).generate(courses, semester)?;
    tracing::info!(
        "Generated {} calendar events",
        ics_content.matches("BEGIN:VEVENT").count()
    );

    write_output(output, &ics_content)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Saved to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export(start: &str, end: &str) -> Payload {
        Payload::Export(ScheduleExport {
            courses: Vec::new(),
            semester_start: start.to_string(),
            semester_end: end.to_string(),
        })
    }

    #[test]
    fn envelope_dates_are_used() {
        let semester = resolve_semester(&export("2025-08-27", "2025-12-12"), None, None).unwrap();
        assert_eq!(semester.start_date.to_string(), "2025-08-27");
        assert_eq!(semester.end_date.to_string(), "2025-12-12");
    }

    #[test]
    fn command_line_dates_override_envelope() {
        let semester = resolve_semester(
            &export("2025-08-27", "2025-12-12"),
            None,
            Some("2025-10-01".to_string()),
        )
        .unwrap();
        assert_eq!(semester.start_date.to_string(), "2025-08-27");
        assert_eq!(semester.end_date.to_string(), "2025-10-01");
    }

    #[test]
    fn bare_course_list_needs_dates() {
        let payload = Payload::Courses(Vec::new());
        assert!(resolve_semester(&payload, Some("2025-08-27".to_string()), None).is_err());
        assert!(
            resolve_semester(
                &payload,
                Some("2025-08-27".to_string()),
                Some("2025-12-12".to_string())
            )
            .is_ok()
        );
    }

    #[test]
    fn invalid_envelope_date_is_rejected() {
        assert!(resolve_semester(&export("next monday", "2025-12-12"), None, None).is_err());
    }

    #[test]
    fn parse_then_generate_through_files() {
        let dir = std::env::temp_dir().join(format!("planner-ics-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let text_path = dir.join("schedule.txt");
        let json_path = dir.join("courses.json");
        let ics_path = dir.join("schedule.ics");

        fs::write(
            &text_path,
            "Schedule Planner\nEnrolled\t29900\tIndustrial Eng & Ops Rsch\t241\t002\n\
             Thibaut Mastrolia\nTTh 11:00am - 12:29pm - Haas Faculty Wing F295\n",
        )
        .unwrap();

        parse_command(ParseParams {
            input: text_path.clone(),
            output: Some(json_path.clone()),
            start: Some("2025-01-21".to_string()),
            end: Some("2025-01-23".to_string()),
        })
        .unwrap();

        generate_command(GenerateParams {
            input: json_path,
            start: None,
            end: None,
            output: Some(ics_path.clone()),
            strict_times: true,
        })
        .unwrap();

        let ics = fs::read_to_string(&ics_path).unwrap();
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("DTSTART:20250121T110000\r\n"));
        assert!(ics.contains("DTSTART:20250123T110000\r\n"));

        convert_command(ConvertParams {
            input: text_path,
            start: "2025-01-21".to_string(),
            end: "2025-01-21".to_string(),
            output: Some(ics_path.clone()),
            strict_times: false,
        })
        .unwrap();
        let ics = fs::read_to_string(&ics_path).unwrap();
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }
}
