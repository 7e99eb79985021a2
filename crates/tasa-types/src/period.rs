//! Period keys and series granularity.
//!
//! A [`PeriodKey`] identifies one entry of a persisted series. Daily series use
//! ISO dates (`2025-07-19`); monthly series use a Spanish month abbreviation
//! plus a two-digit year (`jul-25`). Keys are ordered chronologically by an
//! explicit comparator: the abbreviated form is **not** lexicographically
//! ordered (`"ene-25" > "dic-25"` as strings).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::KeyError;

/// Spanish month abbreviations, January first.
pub const MONTH_ABBR: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Full Spanish month names, January first.
/// Century two-digit years in month keys belong to.
const CENTURY: i32 = 2000;

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Granularity of a series: one key per day or one key per month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One entry per calendar day, keyed `YYYY-MM-DD`.
    Daily,
    /// One entry per calendar month, keyed `mmm-yy`.
    Monthly,
}

impl Granularity {
    /// Returns the granularity as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
        }
    }

    /// Returns the period key containing `date` at this granularity.
    #[must_use]
    pub fn key_for(&self, date: NaiveDate) -> PeriodKey {
        match self {
            Self::Daily => PeriodKey::Day(date),
            Self::Monthly => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Self::Daily),
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            _ => Err(KeyError::UnknownGranularity(s.to_string())),
        }
    }
}

/// Identifier of one entry in a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKey {
    /// A calendar day.
    Day(NaiveDate),
    /// A calendar month. `month` is always in `1..=12`.
    Month {
        /// Full (four-digit) year.
        year: i32,
        /// Month number, January = 1.
        month: u32,
    },
}

impl PeriodKey {
    /// Creates a daily key.
    #[must_use]
    pub const fn day(date: NaiveDate) -> Self {
        Self::Day(date)
    }

    /// Creates a monthly key, validating the month number.
    ///
    /// # Errors
    ///
    /// Returns an error if `month` is not in `1..=12`.
    pub fn month(year: i32, month: u32) -> Result<Self, KeyError> {
        if !(1..=12).contains(&month) {
            return Err(KeyError::MonthOutOfRange(month));
        }
        Ok(Self::Month { year, month })
    }

    /// Returns the granularity this key belongs to.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        match self {
            Self::Day(_) => Granularity::Daily,
            Self::Month { .. } => Granularity::Monthly,
        }
    }

    /// Returns `(year, month)` of the period.
    #[must_use]
    pub fn year_month(&self) -> (i32, u32) {
        match *self {
            Self::Day(date) => (date.year(), date.month()),
            Self::Month { year, month } => (year, month),
        }
    }

    /// Returns the first calendar day covered by this key.
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        match *self {
            Self::Day(date) => Some(date),
            Self::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }

    /// Returns the key one unit later (next day or next month).
    #[must_use]
    pub fn succ(&self) -> Option<Self> {
        match *self {
            Self::Day(date) => date.succ_opt().map(Self::Day),
            Self::Month { year, month: 12 } => Some(Self::Month {
                year: year.checked_add(1)?,
                month: 1,
            }),
            Self::Month { year, month } => Some(Self::Month {
                year,
                month: month + 1,
            }),
        }
    }

    /// Returns the key one unit earlier (previous day or previous month).
    #[must_use]
    pub fn pred(&self) -> Option<Self> {
        match *self {
            Self::Day(date) => date.pred_opt().map(Self::Day),
            Self::Month { year, month: 1 } => Some(Self::Month {
                year: year.checked_sub(1)?,
                month: 12,
            }),
            Self::Month { year, month } => Some(Self::Month {
                year,
                month: month - 1,
            }),
        }
    }

    /// Returns the key `units` steps later.
    #[must_use]
    pub fn offset(&self, units: u32) -> Option<Self> {
        (0..units).try_fold(*self, |key, _| key.succ())
    }

    /// Returns the number of units from `self` to `later` (negative if `later`
    /// is earlier). Both keys must share a granularity.
    #[must_use]
    pub fn units_until(&self, later: &Self) -> Option<i64> {
        match (self, later) {
            (Self::Day(a), Self::Day(b)) => Some((*b - *a).num_days()),
            (Self::Month { .. }, Self::Month { .. }) => {
                let (ya, ma) = self.year_month();
                let (yb, mb) = later.year_month();
                Some(i64::from(yb - ya) * 12 + i64::from(mb) - i64::from(ma))
            }
            _ => None,
        }
    }

    /// Parses a key of the given granularity.
    ///
    /// Two-digit years in month keys always belong to the 2000s, so a key
    /// reads back the same regardless of when it is parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if `s` is not a valid key of that granularity.
    pub fn parse(s: &str, granularity: Granularity) -> Result<Self, KeyError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyError::Empty);
        }
        match granularity {
            Granularity::Daily => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Self::Day)
                .map_err(|_| KeyError::InvalidDate(s.to_string())),
            Granularity::Monthly => {
                let (abbr, yy) = s
                    .split_once('-')
                    .ok_or_else(|| KeyError::InvalidMonthKey(s.to_string()))?;
                let month = month_from_abbr(abbr)
                    .ok_or_else(|| KeyError::UnknownMonth(abbr.to_string()))?;
                if yy.len() != 2 || !yy.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(KeyError::InvalidMonthKey(s.to_string()));
                }
                let yy: i32 = yy
                    .parse()
                    .map_err(|_| KeyError::InvalidMonthKey(s.to_string()))?;
                Self::month(CENTURY + yy, month)
            }
        }
    }

    /// Ensures this key has the expected granularity.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::GranularityMismatch`] otherwise.
    pub fn expect_granularity(self, expected: Granularity) -> Result<Self, KeyError> {
        if self.granularity() == expected {
            Ok(self)
        } else {
            Err(KeyError::GranularityMismatch {
                key: self.to_string(),
                expected,
            })
        }
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_month = || self.year_month().cmp(&other.year_month());
        match (self, other) {
            (Self::Day(a), Self::Day(b)) => a.cmp(b),
            (Self::Month { .. }, Self::Month { .. }) => by_month(),
            // A month key sorts at the start of its month.
            (Self::Month { .. }, Self::Day(_)) => by_month().then(Ordering::Less),
            (Self::Day(_), Self::Month { .. }) => by_month().then(Ordering::Greater),
        }
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Month { year, month } => {
                let abbr = MONTH_ABBR[(month - 1) as usize];
                write!(f, "{}-{:02}", abbr, year.rem_euclid(100))
            }
        }
    }
}

impl FromStr for PeriodKey {
    type Err = KeyError;

    /// Detects the granularity from the shape of `s`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let looks_monthly = trimmed
            .get(..3)
            .is_some_and(|prefix| prefix.chars().all(char::is_alphabetic));
        if looks_monthly {
            Self::parse(trimmed, Granularity::Monthly)
        } else {
            Self::parse(trimmed, Granularity::Daily)
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Returns the month number for a Spanish abbreviation (`"ene"` → 1).
#[must_use]
pub fn month_from_abbr(abbr: &str) -> Option<u32> {
    let abbr = abbr.trim().to_lowercase();
    MONTH_ABBR
        .iter()
        .position(|m| *m == abbr)
        .map(|idx| idx as u32 + 1)
}

/// Returns the month number for a Spanish month name, full or abbreviated,
/// case-insensitive. Accepts the `setiembre` spelling.
#[must_use]
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    if name == "setiembre" || name == "set" {
        return Some(9);
    }
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|idx| idx as u32 + 1)
        .or_else(|| month_from_abbr(&name))
}
