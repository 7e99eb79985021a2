//! In-memory time series.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::PeriodKey;

/// Rounds `value` to `precision` decimal places.
#[must_use]
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// A chronologically ordered mapping of period keys to values.
///
/// Ordering comes from [`PeriodKey`]'s comparator, so iteration, `first` and
/// `latest` are chronological regardless of how keys render as strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: BTreeMap<PeriodKey, f64>,
}

impl TimeSeries {
    /// Creates an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            points: BTreeMap::new(),
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the value stored at `key`.
    #[must_use]
    pub fn get(&self, key: &PeriodKey) -> Option<f64> {
        self.points.get(key).copied()
    }

    /// Returns true if `key` has a value.
    #[must_use]
    pub fn contains(&self, key: &PeriodKey) -> bool {
        self.points.contains_key(key)
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, key: PeriodKey, value: f64) -> Option<f64> {
        self.points.insert(key, value)
    }

    /// Removes a value, returning it.
    pub fn remove(&mut self, key: &PeriodKey) -> Option<f64> {
        self.points.remove(key)
    }

    /// Returns the chronologically earliest entry.
    #[must_use]
    pub fn first(&self) -> Option<(PeriodKey, f64)> {
        self.points.first_key_value().map(|(k, v)| (*k, *v))
    }

    /// Returns the chronologically latest entry.
    #[must_use]
    pub fn latest(&self) -> Option<(PeriodKey, f64)> {
        self.points.last_key_value().map(|(k, v)| (*k, *v))
    }

    /// Returns the latest entry strictly before `key`.
    #[must_use]
    pub fn last_before(&self, key: &PeriodKey) -> Option<(PeriodKey, f64)> {
        self.points
            .range(..*key)
            .next_back()
            .map(|(k, v)| (*k, *v))
    }

    /// Removes every entry at or after `key`, returning them as a new series.
    pub fn split_off(&mut self, key: &PeriodKey) -> Self {
        Self {
            points: self.points.split_off(key),
        }
    }

    /// Returns the last `n` entries in chronological order.
    #[must_use]
    pub fn tail(&self, n: usize) -> Vec<(PeriodKey, f64)> {
        let skip = self.points.len().saturating_sub(n);
        self.iter().skip(skip).collect()
    }

    /// Iterates entries in chronological order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (PeriodKey, f64)> + '_ {
        self.points.iter().map(|(k, v)| (*k, *v))
    }

    /// Iterates keys in chronological order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &PeriodKey> + '_ {
        self.points.keys()
    }
}

impl FromIterator<(PeriodKey, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (PeriodKey, f64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl Extend<(PeriodKey, f64)> for TimeSeries {
    fn extend<I: IntoIterator<Item = (PeriodKey, f64)>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl IntoIterator for TimeSeries {
    type Item = (PeriodKey, f64);
    type IntoIter = btree_map::IntoIter<PeriodKey, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}
