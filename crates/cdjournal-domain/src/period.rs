//! Calendar month periods and their `YYYY-MM` keys.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Years are stored under 4-digit keys.
pub const MIN_YEAR: i32 = 1000;
pub const MAX_YEAR: i32 = 9999;

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const MONTH_NAMES: [&str; 12] = [
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

/// One calendar month of one year. `month` is 1-based (January = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub const FIRST: Period = Period {
        year: MIN_YEAR,
        month: 1,
    };
    pub const LAST: Period = Period {
        year: MAX_YEAR,
        month: MONTHS_PER_YEAR,
    };

    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Builds a period from navigation state, where months are counted from 0.
    pub fn from_zero_based(year: i32, month_index: u32) -> Result<Self, PeriodError> {
        Self::new(year, month_index + 1)
    }

    /// The period containing `date`, clamped to the first or last storable month.
    pub fn containing(date: NaiveDate) -> Self {
        match Self::new(date.year(), date.month()) {
            Ok(period) => period,
            Err(_) if date.year() < MIN_YEAR => Self::FIRST,
            Err(_) => Self::LAST,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn month_index(&self) -> u32 {
        self.month - 1
    }

    /// Storage key, e.g. `2025-03`.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Moves `delta` months forward (or backward when negative), rolling the year over.
    /// Saturates at [`Period::FIRST`] and [`Period::LAST`].
    pub fn step(&self, delta: i32) -> Self {
        let per_year = MONTHS_PER_YEAR as i64;
        let absolute = self.year as i64 * per_year + self.month_index() as i64 + delta as i64;
        let year = absolute.div_euclid(per_year);
        if year < MIN_YEAR as i64 {
            return Self::FIRST;
        }
        if year > MAX_YEAR as i64 {
            return Self::LAST;
        }
        Self {
            year: year as i32,
            month: absolute.rem_euclid(per_year) as u32 + 1,
        }
    }

    pub fn next(&self) -> Self {
        self.step(1)
    }

    pub fn previous(&self) -> Self {
        self.step(-1)
    }

    /// Same month in another year.
    pub fn with_year(&self, year: i32) -> Result<Self, PeriodError> {
        Self::new(year, self.month)
    }

    /// January through December of `year`, in calendar order.
    pub fn months_of(year: i32) -> impl Iterator<Item = Period> {
        (1..=MONTHS_PER_YEAR).map(move |month| Period { year, month })
    }

    pub fn abbreviation(&self) -> &'static str {
        MONTH_ABBREVIATIONS[self.month_index() as usize]
    }

    /// Human label such as `March 2025`.
    pub fn display_name(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month_index() as usize], self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| PeriodError::InvalidKey(trimmed.to_string()))?;
        let well_formed = year.len() == 4
            && month.len() == 2
            && year.bytes().all(|b| b.is_ascii_digit())
            && month.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(PeriodError::InvalidKey(trimmed.to_string()));
        }
        let year = year
            .parse()
            .map_err(|_| PeriodError::InvalidKey(trimmed.to_string()))?;
        let month = month
            .parse()
            .map_err(|_| PeriodError::InvalidKey(trimmed.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.key()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised when constructing or parsing [`Period`] values.
pub enum PeriodError {
    InvalidYear(i32),
    InvalidMonth(u32),
    InvalidKey(String),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::InvalidYear(year) => write!(f, "year {year} is not a 4-digit year"),
            PeriodError::InvalidMonth(month) => write!(f, "month {month} is outside 1-12"),
            PeriodError::InvalidKey(key) => write!(f, "`{key}` is not a YYYY-MM month key"),
        }
    }
}

impl std::error::Error for PeriodError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_based_navigation_maps_to_one_based_key() {
        let period = Period::from_zero_based(2025, 0).expect("period");
        assert_eq!(period.key(), "2025-01");
        let december = Period::from_zero_based(2025, 11).expect("period");
        assert_eq!(december.key(), "2025-12");
        assert!(Period::from_zero_based(2025, 12).is_err());
    }

    #[test]
    fn stepping_wraps_year_boundaries() {
        let december = Period::new(2024, 12).unwrap();
        assert_eq!(december.next(), Period::new(2025, 1).unwrap());
        let january = Period::new(2025, 1).unwrap();
        assert_eq!(january.previous(), december);
        assert_eq!(january.step(-13), Period::new(2023, 12).unwrap());
        assert_eq!(january.step(24), Period::new(2027, 1).unwrap());
    }

    #[test]
    fn stepping_stops_at_four_digit_years() {
        let last = Period::new(9999, 12).unwrap();
        assert_eq!(last.next(), Period::LAST);
        assert_eq!(last.step(30).key(), "9999-12");
        let first = Period::new(1000, 1).unwrap();
        assert_eq!(first.previous(), Period::FIRST);
        assert_eq!(Period::new(1000, 6).unwrap().step(-100).key(), "1000-01");
    }

    #[test]
    fn containing_clamps_out_of_range_dates() {
        let far = NaiveDate::from_ymd_opt(12_000, 5, 1).unwrap();
        assert_eq!(Period::containing(far), Period::LAST);
        let early = NaiveDate::from_ymd_opt(800, 5, 1).unwrap();
        assert_eq!(Period::containing(early), Period::FIRST);
        let today = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert_eq!(Period::containing(today).key(), "2025-07");
    }

    #[test]
    fn parses_month_keys() {
        assert_eq!("2025-03".parse::<Period>(), Period::new(2025, 3));
        assert!("2025-3".parse::<Period>().is_err());
        assert!("2025-13".parse::<Period>().is_err());
        assert!("25-03".parse::<Period>().is_err());
    }

    #[test]
    fn months_of_year_are_in_calendar_order() {
        let keys: Vec<String> = Period::months_of(2025).map(|p| p.key()).collect();
        assert_eq!(keys.len(), 12);
        assert_eq!(keys.first().map(String::as_str), Some("2025-01"));
        assert_eq!(keys.last().map(String::as_str), Some("2025-12"));
    }
}
