//! Inclusive ranges of period keys.

use crate::{KeyError, PeriodKey};

/// An inclusive range of period keys of one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    /// First key (inclusive).
    pub start: PeriodKey,
    /// Last key (inclusive).
    pub end: PeriodKey,
}

impl PeriodRange {
    /// Creates a new range, validating that start <= end and that both keys
    /// share a granularity.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or mixes granularities.
    pub fn new(start: PeriodKey, end: PeriodKey) -> Result<Self, KeyError> {
        if start.granularity() != end.granularity() {
            return Err(KeyError::GranularityMismatch {
                key: end.to_string(),
                expected: start.granularity(),
            });
        }
        if start > end {
            return Err(KeyError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }
}

impl std::fmt::Display for PeriodRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..={}", self.start, self.end)
        }
    }
}
