use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How exact a recorded date is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Qualifier {
    /// The date is taken at face value.
    #[default]
    Exact,
    /// Approximately the given date (`abt`).
    About,
    /// Some time before the given date (`bef`).
    Before,
    /// Some time after the given date (`aft`).
    After,
    /// Estimated or calculated (`est`).
    Estimated,
}

impl Qualifier {
    const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Exact => None,
            Self::About => Some("abt"),
            Self::Before => Some("bef"),
            Self::After => Some("aft"),
            Self::Estimated => Some("est"),
        }
    }
}

/// A possibly partial genealogical date.
///
/// Genealogical sources often record only a year, or a year and month, so
/// the month and day are optional. The textual form is
/// `[abt|bef|aft|est ]YYYY[-MM[-DD]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Date {
    qualifier: Qualifier,
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
}

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(abt|about|bef|before|aft|after|est|estimated)\.?\s+)?(\d{1,4})(?:-(\d{1,2})(?:-(\d{1,2}))?)?$")
        .expect("date pattern is valid")
});

impl Date {
    /// Creates an exact date with only a year.
    #[must_use]
    pub const fn year_only(year: i32) -> Self {
        Self {
            qualifier: Qualifier::Exact,
            year,
            month: None,
            day: None,
        }
    }

    /// Creates an exact calendar date.
    ///
    /// # Errors
    ///
    /// Returns an error if the month/day combination does not exist.
    pub fn ymd(year: i32, month: u32, day: u32) -> Result<Self, InvalidDateError> {
        let date = Self {
            qualifier: Qualifier::Exact,
            year,
            month: Some(month),
            day: Some(day),
        };
        date.validate(&format!("{year:04}-{month:02}-{day:02}"))?;
        Ok(date)
    }

    /// Returns a copy of this date with the given qualifier.
    #[must_use]
    pub const fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = qualifier;
        self
    }

    /// The qualifier attached to the date.
    #[must_use]
    pub const fn qualifier(&self) -> Qualifier {
        self.qualifier
    }

    /// The year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The month (1-12), if recorded.
    #[must_use]
    pub const fn month(&self) -> Option<u32> {
        self.month
    }

    /// The day of the month, if recorded.
    #[must_use]
    pub const fn day(&self) -> Option<u32> {
        self.day
    }

    /// Whether this date is a plain, fully specified calendar date.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        matches!(self.qualifier, Qualifier::Exact) && self.month.is_some() && self.day.is_some()
    }

    /// Converts a fully specified date into a calendar date.
    #[must_use]
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month?, self.day?)
    }

    fn validate(&self, text: &str) -> Result<(), InvalidDateError> {
        match (self.month, self.day) {
            (Some(month), _) if !(1..=12).contains(&month) => {
                Err(InvalidDateError(text.to_string()))
            }
            (Some(month), Some(day)) => NaiveDate::from_ymd_opt(self.year, month, day)
                .map(|_| ())
                .ok_or_else(|| InvalidDateError(text.to_string())),
            (None, Some(_)) => Err(InvalidDateError(text.to_string())),
            _ => Ok(()),
        }
    }
}

impl FromStr for Date {
    type Err = InvalidDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let captures = DATE_PATTERN
            .captures(&lowered)
            .ok_or_else(|| InvalidDateError(s.to_string()))?;

        let qualifier = match captures.get(1).map(|m| m.as_str()) {
            None => Qualifier::Exact,
            Some("abt" | "about") => Qualifier::About,
            Some("bef" | "before") => Qualifier::Before,
            Some("aft" | "after") => Qualifier::After,
            Some(_) => Qualifier::Estimated,
        };

        let number = |index: usize| -> Result<Option<u32>, InvalidDateError> {
            captures
                .get(index)
                .map(|m| m.as_str().parse::<u32>())
                .transpose()
                .map_err(|_| InvalidDateError(s.to_string()))
        };

        let year = captures
            .get(2)
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .ok_or_else(|| InvalidDateError(s.to_string()))?;

        let date = Self {
            qualifier,
            year,
            month: number(3)?,
            day: number(4)?,
        };
        date.validate(s)?;
        Ok(date)
    }
}

impl TryFrom<String> for Date {
    type Error = InvalidDateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Date> for String {
    fn from(date: Date) -> Self {
        date.to_string()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.qualifier.keyword() {
            write!(f, "{keyword} ")?;
        }
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{month:02}")?;
            if let Some(day) = self.day {
                write!(f, "-{day:02}")?;
            }
        }
        Ok(())
    }
}

/// Error returned when a date string cannot be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid date '{0}': expected [abt|bef|aft|est ]YYYY[-MM[-DD]]")]
pub struct InvalidDateError(String);
