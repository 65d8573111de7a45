//! Date parsing and age arithmetic for mortality records
//!
//! Source files store dates as 8-digit `YYYYMMDD` strings. Unknown days or
//! months are written as `00`, which is not a calendar date and is reported as
//! a [`ParseFault`] so the caller can drop the row.

use chrono::NaiveDate;

/// Average length of a Gregorian year in days
pub const DAYS_PER_YEAR: f64 = 365.2425;

/// Why a date field could not be turned into a [`NaiveDate`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFault {
    /// The field is empty or whitespace
    #[error("empty date")]
    Empty,
    /// The field is not 8 characters long
    #[error("expected 8 digits, found {0} characters")]
    WrongLength(usize),
    /// The field contains something other than ASCII digits
    #[error("non-digit character in date {0:?}")]
    NonDigit(String),
    /// The digits do not name a real calendar day
    #[error("no such date: {year:04}-{month:02}-{day:02}")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

/// Parse a `YYYYMMDD` date
///
/// Surrounding whitespace is ignored.
///
/// # Examples
/// ```
/// use insee_deces::utils::date::{parse_date, ParseFault};
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_date("20200615"), Ok(NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()));
/// assert!(matches!(parse_date("19400000"), Err(ParseFault::OutOfRange { .. })));
/// ```
pub fn parse_date(raw: &str) -> Result<NaiveDate, ParseFault> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ParseFault::Empty);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseFault::NonDigit(s.to_string()));
    }
    if s.len() != 8 {
        return Err(ParseFault::WrongLength(s.len()));
    }

    // All-digit and length-checked, so the slices parse
    let year: i32 = s[0..4].parse().map_err(|_| ParseFault::NonDigit(s.to_string()))?;
    let month: u32 = s[4..6].parse().map_err(|_| ParseFault::NonDigit(s.to_string()))?;
    let day: u32 = s[6..8].parse().map_err(|_| ParseFault::NonDigit(s.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(ParseFault::OutOfRange { year, month, day })
}

/// Age at `death` of someone born on `birth`, in fractional years
///
/// Negative when `death` precedes `birth`.
#[must_use]
pub fn age_in_years(birth: NaiveDate, death: NaiveDate) -> f64 {
    let days = (death - birth).num_days();
    days as f64 / DAYS_PER_YEAR
}
