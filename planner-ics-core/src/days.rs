use chrono::Weekday;

/// Day-code table, longest codes first so that `Th` is never read as `T` + `h`.
const DAY_CODES: &[(&str, Weekday)] = &[
    ("Wednesday", Weekday::Wed),
    ("Thursday", Weekday::Thu),
    ("Saturday", Weekday::Sat),
    ("Tuesday", Weekday::Tue),
    ("Monday", Weekday::Mon),
    ("Friday", Weekday::Fri),
    ("Sunday", Weekday::Sun),
    ("Th", Weekday::Thu),
    ("Tu", Weekday::Tue),
    ("Sa", Weekday::Sat),
    ("Su", Weekday::Sun),
    ("M", Weekday::Mon),
    ("T", Weekday::Tue),
    ("W", Weekday::Wed),
    ("R", Weekday::Thu),
    ("F", Weekday::Fri),
];

/// One token of a `days` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayToken<'a> {
    pub code: &'a str,
    /// `None` for codes outside the table
    pub weekday: Option<Weekday>,
}

/// Split a concatenated day-code run (`MWF`, `TTh`, `TuTh`) into tokens.
///
/// Unknown characters come back as single-character tokens with no weekday
/// so callers decide whether to drop them. Whitespace is skipped.
pub fn tokenize(days: &str) -> DayTokens<'_> {
    DayTokens { rest: days }
}

/// Iterator returned by [`tokenize`]
pub struct DayTokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for DayTokens<'a> {
    type Item = DayToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest: &'a str = self.rest.trim_start();
        let first = rest.chars().next()?;

        let (code, weekday) = DAY_CODES
            .iter()
            .find(|(known, _)| rest.starts_with(known))
            .map_or_else(
                || (&rest[..first.len_utf8()], None),
                |(known, weekday)| (&rest[..known.len()], Some(*weekday)),
            );

        self.rest = &rest[code.len()..];
        Some(DayToken { code, weekday })
    }
}

/// Weekdays of a `days` string in order, unknown codes dropped
pub fn weekdays(days: &str) -> impl Iterator<Item = Weekday> + '_ {
    tokenize(days).filter_map(|token| token.weekday)
}
