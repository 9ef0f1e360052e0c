use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

/// Configuration literal selecting [`DateFormat::SplitHeuristic`].
pub const SPLIT_HEURISTIC: &str = "split-heuristic";

/// One candidate format for [`parse_date`].
///
/// In YAML every entry is a string: either a chrono format such as
/// `"%d/%m/%Y"`, or the literal `split-heuristic`.
///
/// A `%Y` field only matches a year written with exactly four digits, and
/// year 0 is rejected by every format. chrono alone would read `01-02-03`
/// under `%Y-%m-%d` as year 1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DateFormat {
    Pattern(String),
    /// Separator-agnostic `Y-M-D` / `D-M-Y` guess.
    ///
    /// `/` is replaced with `-` and the string split on `-`; anything other
    /// than exactly three parts fails. If the first part is four characters
    /// long the order is year-month-day, otherwise day-month-year. Each part
    /// must parse as an integer and the result must be a real calendar date
    /// in year 1 or later.
    ///
    /// Fully numeric ambiguous input is read literally: `01-02-03` is
    /// 1 February of year 3.
    SplitHeuristic,
}

impl From<String> for DateFormat {
    fn from(value: String) -> Self {
        if value == SPLIT_HEURISTIC {
            DateFormat::SplitHeuristic
        } else {
            DateFormat::Pattern(value)
        }
    }
}

impl From<&str> for DateFormat {
    fn from(value: &str) -> Self {
        DateFormat::from(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("date is empty")]
    Empty,
    #[error("'{0}' matches none of the candidate formats")]
    NoMatchingFormat(String),
}

/// Parses `raw` with each format in order; the first success wins.
///
/// Never panics: empty input, unmatched input and out-of-range components
/// all come back as a [`DateParseError`].
pub fn parse_date(raw: &str, formats: &[DateFormat]) -> Result<NaiveDate, DateParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DateParseError::Empty);
    }
    formats
        .iter()
        .find_map(|format| match format {
            DateFormat::Pattern(pattern) => parse_pattern(value, pattern),
            DateFormat::SplitHeuristic => parse_split_heuristic(value),
        })
        .ok_or_else(|| DateParseError::NoMatchingFormat(value.to_string()))
}

fn parse_pattern(value: &str, pattern: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, pattern).ok()?;
    if date.year() < 1 || (pattern.contains("%Y") && !has_four_digit_year(value, date.year())) {
        return None;
    }
    Some(date)
}

/// Some digit run in `value` spells the year with exactly four digits.
fn has_four_digit_year(value: &str, year: i32) -> bool {
    let year = format!("{:04}", year);
    value
        .split(|c: char| !c.is_ascii_digit())
        .any(|run| run == year)
}

fn parse_split_heuristic(value: &str) -> Option<NaiveDate> {
    let normalized = value.replace('/', "-");
    let parts: Vec<&str> = normalized.split('-').collect();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };
    let numbers = (
        first.trim().parse::<i64>().ok()?,
        second.trim().parse::<i64>().ok()?,
        third.trim().parse::<i64>().ok()?,
    );
    let (year, month, day) = if first.len() == 4 {
        numbers
    } else {
        (numbers.2, numbers.1, numbers.0)
    };
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
    .filter(|date| date.year() >= 1)
}
