use chrono::{
    Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday,
    format::{self, ParseResult, Parsed, StrftimeItems},
};

use crate::{Course, Error, Result, Semester, days};

/// One concrete meeting of a course, in floating local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Meeting start
    pub start: NaiveDateTime,
    /// Meeting end
    pub end: NaiveDateTime,
}

impl Occurrence {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Expands weekly meeting patterns over a semester
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceExpander {
    semester: Semester,
}

impl RecurrenceExpander {
    pub fn new(semester: Semester) -> Self {
        Self { semester }
    }

    /// First date on or after the semester start falling on `weekday`
    pub fn first_on_or_after(&self, weekday: Weekday) -> Option<NaiveDate> {
        let mut date = self.semester.start_date;
        for _ in 0..7 {
            if date.weekday() == weekday {
                return Some(date);
            }
            date = date.succ_opt()?;
        }
        None
    }

    /// Every date in the semester falling on `weekday`, end date inclusive
    pub fn dates_for(&self, weekday: Weekday) -> impl Iterator<Item = NaiveDate> + '_ {
        std::iter::successors(self.first_on_or_after(weekday), |date| {
            date.checked_add_days(Days::new(7))
        })
        .take_while(move |date| self.semester.contains(*date))
    }

    /// All occurrences of one course, grouped by day-code in the order the
    /// codes appear in `days`.
    ///
    /// Unknown day-codes are dropped. Time tokens are only parsed when at
    /// least one day-code maps to a weekday, so a course without a schedule
    /// never fails.
    pub fn expand(&self, course: &Course) -> Result<Vec<Occurrence>> {
        let weekdays: Vec<Weekday> = days::weekdays(&course.schedule.days).collect();
        if weekdays.is_empty() {
            return Ok(Vec::new());
        }

        let start_time = parse_course_time(course, &course.schedule.start_time)?;
        let end_time = parse_course_time(course, &course.schedule.end_time)?;

        let occurrences: Vec<Occurrence> = weekdays
            .into_iter()
            .flat_map(|weekday| self.dates_for(weekday))
            .map(|date| Occurrence {
                start: date.and_time(start_time),
                end: date.and_time(end_time),
            })
            .collect();

        tracing::debug!(
            "Expanded {} into {} occurrences",
            course.label(),
            occurrences.len()
        );

        Ok(occurrences)
    }
}

fn parse_course_time(course: &Course, token: &str) -> Result<NaiveTime> {
    parse_time_token(token).ok_or_else(|| Error::InvalidTime {
        course: course.label(),
        value: token.to_string(),
    })
}

/// Parse a 12-hour time token such as `12:00pm`, falling back to the
/// hour-only form `12pm`. Embedded spaces are ignored.
pub fn parse_time_token(token: &str) -> Option<NaiveTime> {
    let compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();

    NaiveTime::parse_from_str(&compact, "%I:%M%p")
        .or_else(|_| parse_hour_only(&compact))
        .ok()
}

fn parse_hour_only(token: &str) -> ParseResult<NaiveTime> {
    let mut parsed = Parsed::default();
    format::parse(&mut parsed, token, StrftimeItems::new("%I%p"))?;
    parsed.set_minute(0)?;
    parsed.to_naive_time()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schedule;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expander(start: NaiveDate, end: NaiveDate) -> RecurrenceExpander {
        RecurrenceExpander::new(Semester::new(start, end))
    }

    fn course(days: &str, start: &str, end: &str) -> Course {
        Course {
            id: "1".to_string(),
            name: "Test Course".to_string(),
            number: "101".to_string(),
            schedule: Schedule {
                start_time: start.to_string(),
                end_time: end.to_string(),
                days: days.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn time_tokens() {
        assert_eq!(
            parse_time_token("12:00pm"),
            NaiveTime::from_hms_opt(12, 0, 0)
        );
        assert_eq!(
            parse_time_token("12:59pm"),
            NaiveTime::from_hms_opt(12, 59, 0)
        );
        assert_eq!(parse_time_token("9:30am"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_time_token("12:00am"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_time_token("12:00 PM"), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(parse_time_token("12pm"), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(parse_time_token("3pm"), NaiveTime::from_hms_opt(15, 0, 0));
        assert_eq!(parse_time_token(""), None);
        assert_eq!(parse_time_token("noon"), None);
        assert_eq!(parse_time_token("25:00pm"), None);
        assert_eq!(parse_time_token("14:00"), None);
    }

    #[test]
    fn anchor_is_found_within_a_week() {
        // 2025-09-01 is a Monday
        let expander = expander(date(2025, 9, 1), date(2025, 12, 31));
        assert_eq!(
            expander.first_on_or_after(Weekday::Mon),
            Some(date(2025, 9, 1))
        );
        assert_eq!(
            expander.first_on_or_after(Weekday::Sun),
            Some(date(2025, 9, 7))
        );
    }

    #[test]
    fn tuesday_thursday_over_one_week() {
        let expander = expander(date(2025, 1, 20), date(2025, 1, 23));
        let occurrences = expander
            .expand(&course("TTh", "11:00am", "12:29pm"))
            .unwrap();

        assert_eq!(occurrences.len(), 2);
        assert_eq!(
            occurrences[0].start,
            date(2025, 1, 21).and_hms_opt(11, 0, 0).unwrap()
        );
        assert_eq!(
            occurrences[0].end,
            date(2025, 1, 21).and_hms_opt(12, 29, 0).unwrap()
        );
        assert_eq!(occurrences[1].date(), date(2025, 1, 23));
    }

    #[test]
    fn end_date_is_inclusive() {
        let expander = expander(date(2025, 9, 1), date(2025, 9, 8));
        let occurrences = expander.expand(&course("M", "10:00am", "11:00am")).unwrap();
        assert_eq!(
            occurrences.iter().map(Occurrence::date).collect::<Vec<_>>(),
            vec![date(2025, 9, 1), date(2025, 9, 8)]
        );

        let expander = self::expander(date(2025, 9, 1), date(2025, 9, 7));
        let occurrences = expander.expand(&course("M", "10:00am", "11:00am")).unwrap();
        assert_eq!(occurrences.len(), 1);
    }

    #[test]
    fn weekly_steps_over_a_semester() {
        let expander = expander(date(2025, 8, 27), date(2025, 12, 12));
        let dates: Vec<_> = expander.dates_for(Weekday::Wed).collect();
        assert_eq!(dates.first(), Some(&date(2025, 8, 27)));
        assert_eq!(dates.last(), Some(&date(2025, 12, 10)));
        assert_eq!(dates.len(), 16);
        assert!(dates.windows(2).all(|w| (w[1] - w[0]).num_days() == 7));
    }

    #[test]
    fn unknown_codes_produce_nothing() {
        let expander = expander(date(2025, 9, 1), date(2025, 12, 31));
        assert!(expander.expand(&course("X", "10:00am", "11:00am")).unwrap().is_empty());
        // times are never looked at without a usable day-code
        assert!(expander.expand(&course("", "", "")).unwrap().is_empty());
        assert!(expander.expand(&course("X", "garbage", "")).unwrap().is_empty());
    }

    #[test]
    fn inverted_range_is_empty() {
        let expander = expander(date(2025, 12, 31), date(2025, 9, 1));
        assert!(expander.expand(&course("MTWThF", "10:00am", "11:00am")).unwrap().is_empty());
    }

    #[test]
    fn bad_time_is_reported() {
        let expander = expander(date(2025, 9, 1), date(2025, 12, 31));
        let err = expander.expand(&course("MW", "10:00", "11:00am")).unwrap_err();
        match err {
            Error::InvalidTime { course, value } => {
                assert_eq!(course, "Test Course 101 (1)");
                assert_eq!(value, "10:00");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn hour_only_fallback_is_used() {
        let expander = expander(date(2025, 9, 1), date(2025, 9, 1));
        let occurrences = expander.expand(&course("M", "9am", "10am")).unwrap();
        assert_eq!(
            occurrences,
            vec![Occurrence {
                start: date(2025, 9, 1).and_hms_opt(9, 0, 0).unwrap(),
                end: date(2025, 9, 1).and_hms_opt(10, 0, 0).unwrap(),
            }]
        );
    }
}
