//! Birth-date normalisation.
//!
//! Clients submit a birth date either as a calendar date or as an age in
//! whole years. The raw value is classified once at the boundary into a
//! [`BirthDateInput`] and then normalised into a [`BirthDate`] by trying an
//! ordered list of parsers; the first success wins.
//!
//! Age-derived dates are anchored to January 1st of `current_year - age`.
//! "Today" is always passed in by the caller so the rules stay pure and
//! deterministic under test.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Youngest accepted age, in years.
pub const MIN_AGE: i64 = 1;
/// Oldest accepted age, in years.
pub const MAX_AGE: i64 = 150;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Reasons a birth date cannot be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthDateError {
    /// The value is neither a recognisable date nor a whole-number age.
    InvalidFormat,
    /// The age lies outside [`MIN_AGE`]..=[`MAX_AGE`].
    OutOfRange { min: i64, max: i64 },
    /// The date lies after today.
    FutureDate,
}

impl BirthDateError {
    fn out_of_range() -> Self {
        Self::OutOfRange {
            min: MIN_AGE,
            max: MAX_AGE,
        }
    }
}

impl fmt::Display for BirthDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(
                f,
                "birth_date must be a date (YYYY-MM-DD) or an age in whole years"
            ),
            Self::OutOfRange { min, max } => {
                write!(f, "age must be between {min} and {max} years")
            }
            Self::FutureDate => write!(f, "birth_date must not be in the future"),
        }
    }
}

impl std::error::Error for BirthDateError {}

/// Birth-date input as submitted by a client, decided once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BirthDateInput {
    /// Textual input: a date, or an age written as digits.
    IsoDate(String),
    /// Numeric input interpreted as an age in whole years.
    Age(i64),
}

impl BirthDateInput {
    /// Classify a raw JSON value.
    ///
    /// Strings become [`BirthDateInput::IsoDate`] and integral numbers become
    /// [`BirthDateInput::Age`]. Integral floats such as `30.0` count as ages;
    /// integers too large for `i64` are out of range rather than malformed.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use user_registry::domain::BirthDateInput;
    ///
    /// assert_eq!(BirthDateInput::from_json(&json!(30)), Ok(BirthDateInput::Age(30)));
    /// assert!(BirthDateInput::from_json(&json!(true)).is_err());
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, BirthDateError> {
        match value {
            Value::String(raw) => Ok(Self::IsoDate(raw.trim().to_owned())),
            Value::Number(number) => {
                if let Some(age) = number.as_i64() {
                    return Ok(Self::Age(age));
                }
                if number.is_u64() {
                    return Err(BirthDateError::out_of_range());
                }
                match number.as_f64() {
                    Some(age) if age.fract() == 0.0 && age.abs() <= MAX_AGE as f64 => {
                        #[expect(
                            clippy::cast_possible_truncation,
                            reason = "integral and bounded by MAX_AGE"
                        )]
                        let age = age as i64;
                        Ok(Self::Age(age))
                    }
                    Some(age) if age.fract() == 0.0 => Err(BirthDateError::out_of_range()),
                    _ => Err(BirthDateError::InvalidFormat),
                }
            }
            _ => Err(BirthDateError::InvalidFormat),
        }
    }
}

/// Canonical birth date, rendered as `YYYY-MM-DD`.
///
/// ## Invariants
/// - Values built through [`BirthDate::resolve`] are never after the
///   supplied "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// Wrap a date that was validated before it was stored.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Normalise raw input and reject dates after `today`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use user_registry::domain::{BirthDate, BirthDateInput};
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
    /// let date = BirthDate::resolve(&BirthDateInput::Age(30), today).expect("valid age");
    /// assert_eq!(date.to_string(), "1995-01-01");
    /// ```
    pub fn resolve(input: &BirthDateInput, today: NaiveDate) -> Result<Self, BirthDateError> {
        normalise(input, today)?.ensure_not_future(today)
    }

    /// Reject the date when it lies strictly after `today`.
    pub fn ensure_not_future(self, today: NaiveDate) -> Result<Self, BirthDateError> {
        if self.0 > today {
            return Err(BirthDateError::FutureDate);
        }
        Ok(self)
    }

    /// Access the underlying calendar date.
    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

/// Normalise raw input into a canonical date without the future-date check.
///
/// Textual input is tried against each date parser in turn (full dates,
/// timestamps, then `YYYY-MM` and `YYYY`), then as an ASCII digits-only age.
/// Numeric input is always an age.
pub fn normalise(input: &BirthDateInput, today: NaiveDate) -> Result<BirthDate, BirthDateError> {
    match input {
        BirthDateInput::IsoDate(raw) => normalise_text(raw, today),
        BirthDateInput::Age(age) => date_from_age(*age, today),
    }
}

type DateParser = fn(&str) -> Option<NaiveDate>;

const DATE_PARSERS: [DateParser; 6] = [
    parse_canonical,
    parse_rfc3339,
    parse_naive_timestamp,
    parse_slashed,
    parse_year_month,
    parse_year,
];

fn normalise_text(raw: &str, today: NaiveDate) -> Result<BirthDate, BirthDateError> {
    if let Some(date) = DATE_PARSERS.iter().find_map(|parse| parse(raw)) {
        return Ok(BirthDate(date));
    }

    if digits_regex().is_match(raw) {
        // Digits that overflow i64 are certainly older than MAX_AGE.
        let age = raw
            .parse::<i64>()
            .map_err(|_| BirthDateError::out_of_range())?;
        return date_from_age(age, today);
    }

    Err(BirthDateError::InvalidFormat)
}

fn parse_canonical(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, CANONICAL_FORMAT).ok()
}

fn parse_rfc3339(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
}

fn parse_naive_timestamp(raw: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

fn parse_slashed(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y/%m/%d").ok()
}

/// Reduced-precision ISO 8601 `YYYY-MM`, anchored to the first of the month.
fn parse_year_month(raw: &str) -> Option<NaiveDate> {
    let (year, month) = raw.split_once('-')?;
    if !is_fixed_digits(year, 4) || !is_fixed_digits(month, 2) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Reduced-precision ISO 8601 `YYYY`, anchored to January 1st.
///
/// Runs before the age branch, so four-digit strings are years, never ages.
fn parse_year(raw: &str) -> Option<NaiveDate> {
    if !is_fixed_digits(raw, 4) {
        return None;
    }
    NaiveDate::from_ymd_opt(raw.parse().ok()?, 1, 1)
}

fn is_fixed_digits(raw: &str, width: usize) -> bool {
    raw.len() == width && raw.bytes().all(|byte| byte.is_ascii_digit())
}

fn date_from_age(age: i64, today: NaiveDate) -> Result<BirthDate, BirthDateError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(BirthDateError::out_of_range());
    }
    let age = i32::try_from(age).map_err(|_| BirthDateError::out_of_range())?;
    NaiveDate::from_ymd_opt(today.year() - age, 1, 1)
        .map(BirthDate)
        .ok_or(BirthDateError::InvalidFormat)
}

static DIGITS_RE: OnceLock<Regex> = OnceLock::new();

fn digits_regex() -> &'static Regex {
    DIGITS_RE.get_or_init(|| {
        Regex::new(r"^[0-9]+$")
            .unwrap_or_else(|error| panic!("digits regex failed to compile: {error}"))
    })
}
