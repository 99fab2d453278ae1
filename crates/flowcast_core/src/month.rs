//! Month-key arithmetic for `"YYYY-MM"` bucket keys.
//!
//! Every component of the engine buckets by calendar month. The arithmetic
//! lives here so calendar edge cases (year rollover, month-number bounds) are
//! handled in exactly one place — no caller does its own string slicing or
//! modular month math.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseMonthKeyError;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month, the engine's aggregation bucket.
///
/// Ordering is `(year, month)`, which is identical to lexicographic order of
/// the `"YYYY-MM"` rendering. Serializes as that string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i16,
    month: i8,
}

impl MonthKey {
    /// Build a key from a year and a 1-based month number.
    ///
    /// Callers are expected to pass a valid month number; arithmetic in this
    /// module never produces one outside 1..=12.
    pub fn new(year: i16, month: i8) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    /// The month a calendar day falls in.
    pub fn from_date(date: jiff::civil::Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i16 {
        self.year
    }

    /// 1-based calendar month number (1 = January).
    pub fn month_number(self) -> i8 {
        self.month
    }

    /// Add `n` calendar months; negative values go backwards. Year rollover
    /// is handled here, once.
    pub fn add_months(self, n: i32) -> Self {
        let zero_based = i32::from(self.year) * 12 + (i32::from(self.month) - 1) + n;
        Self {
            year: zero_based.div_euclid(12) as i16,
            month: (zero_based.rem_euclid(12) + 1) as i8,
        }
    }

    /// The immediately following month.
    pub fn next(self) -> Self {
        self.add_months(1)
    }

    /// Signed month count from `earlier` to `self` (positive when `self` is
    /// later).
    pub fn months_since(self, earlier: MonthKey) -> i32 {
        (i32::from(self.year) - i32::from(earlier.year)) * 12
            + (i32::from(self.month) - i32::from(earlier.month))
    }

    /// Short display label, e.g. `"Mar 2024"`.
    pub fn label(self) -> String {
        format!("{} {}", MONTH_LABELS[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseMonthKeyError::Malformed(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(malformed());
        }
        let year: i16 = year.parse().map_err(|_| malformed())?;
        let month: i8 = month.parse().map_err(|_| malformed())?;
        if !(1..=12).contains(&month) {
            return Err(ParseMonthKeyError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
