use chrono::Datelike;

use crate::domain::{Date, DateFormat, EventType, date::Qualifier};

/// Language-specific text used by the report.
pub trait Locale {
    /// Formats a date for a details line.
    fn format_date(&self, date: &Date) -> String;

    /// The age between two dates, e.g. `45 years`.
    ///
    /// Returns `None` when the span cannot be computed or is negative.
    fn age_between(&self, start: &Date, end: &Date) -> Option<String>;

    /// The abbreviation that leads a details line, e.g. `b.` for a birth.
    fn event_abbreviation(&self, kind: EventType) -> &'static str;

    /// Placeholder for an empty name.
    fn unknown(&self) -> &'static str;
}

/// English report text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnglishLocale {
    date_format: DateFormat,
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl EnglishLocale {
    /// Creates a locale writing dates in `date_format`.
    #[must_use]
    pub const fn new(date_format: DateFormat) -> Self {
        Self { date_format }
    }

    fn long_date(date: &Date) -> String {
        let qualifier = match date.qualifier() {
            Qualifier::Exact => "",
            Qualifier::About => "about ",
            Qualifier::Before => "before ",
            Qualifier::After => "after ",
            Qualifier::Estimated => "estimated ",
        };
        let month = date
            .month()
            .and_then(|m| MONTHS.get(usize::try_from(m).ok()?.checked_sub(1)?))
            .copied();

        match (date.day(), month) {
            (Some(day), Some(month)) => format!("{qualifier}{day} {month} {}", date.year()),
            (None, Some(month)) => format!("{qualifier}{month} {}", date.year()),
            _ => format!("{qualifier}{}", date.year()),
        }
    }

    fn year_date(date: &Date) -> String {
        match date.qualifier() {
            Qualifier::Exact => date.year().to_string(),
            _ => Date::year_only(date.year())
                .with_qualifier(date.qualifier())
                .to_string(),
        }
    }
}

impl Locale for EnglishLocale {
    fn format_date(&self, date: &Date) -> String {
        match self.date_format {
            DateFormat::Year => Self::year_date(date),
            DateFormat::Iso => date.to_string(),
            DateFormat::Long => Self::long_date(date),
        }
    }

    fn age_between(&self, start: &Date, end: &Date) -> Option<String> {
        let approximate =
            start.qualifier() != Qualifier::Exact || end.qualifier() != Qualifier::Exact;

        let (amount, unit) = match (start.to_naive(), end.to_naive()) {
            (Some(start), Some(end)) => {
                if end < start {
                    return None;
                }
                let months = i64::from(end.year() - start.year()) * 12
                    + i64::from(end.month())
                    - i64::from(start.month())
                    - i64::from(end.day() < start.day());
                if months >= 12 {
                    (months / 12, "year")
                } else if months > 0 {
                    (months, "month")
                } else {
                    ((end - start).num_days(), "day")
                }
            }
            _ => {
                let mut years = end.year() - start.year();
                if let (Some(a), Some(b)) = (start.month(), end.month()) {
                    if b < a {
                        years -= 1;
                    }
                }
                if years < 0 {
                    return None;
                }
                (i64::from(years), "year")
            }
        };

        let plural = if amount == 1 { "" } else { "s" };
        let about = if approximate { "about " } else { "" };
        Some(format!("{about}{amount} {unit}{plural}"))
    }

    fn event_abbreviation(&self, kind: EventType) -> &'static str {
        match kind {
            EventType::Birth => "b.",
            EventType::Baptism => "bap.",
            EventType::Christening => "chr.",
            EventType::Death => "d.",
            EventType::Burial => "bur.",
            EventType::Cremation => "crem.",
            EventType::Marriage => "m.",
            EventType::Other => "e.",
        }
    }

    fn unknown(&self) -> &'static str {
        "Unknown"
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test_case(DateFormat::Year, "1900-03-12", "1900")]
    #[test_case(DateFormat::Year, "abt 1900-03", "abt 1900")]
    #[test_case(DateFormat::Iso, "1900-03-12", "1900-03-12")]
    #[test_case(DateFormat::Long, "1900-03-12", "12 March 1900")]
    #[test_case(DateFormat::Long, "bef 1900-03", "before March 1900")]
    #[test_case(DateFormat::Long, "1900", "1900")]
    fn formats_dates(format: DateFormat, input: &str, expected: &str) {
        assert_eq!(EnglishLocale::new(format).format_date(&date(input)), expected);
    }

    #[test_case("1850-06-01", "1900-05-31", Some("49 years"))]
    #[test_case("1850-06-01", "1900-06-01", Some("50 years"))]
    #[test_case("1900-01-01", "1900-04-15", Some("3 months"))]
    #[test_case("1900-01-01", "1900-01-02", Some("1 day"))]
    #[test_case("1850", "1900", Some("50 years"); "year precision is not approximate")]
    #[test_case("1850-06", "1900-03", Some("49 years"))]
    #[test_case("abt 1850", "1900-01-01", Some("about 50 years"))]
    #[test_case("1900", "1850", None)]
    fn ages(start: &str, end: &str, expected: Option<&str>) {
        let locale = EnglishLocale::default();
        assert_eq!(
            locale.age_between(&date(start), &date(end)).as_deref(),
            expected
        );
    }
}
