//! A single data point reported by a publisher.

use serde::{Deserialize, Serialize};

use crate::PeriodKey;

/// What a publisher currently reports for one series.
///
/// `value` is either the series level at `key` or a rate, depending on the
/// series semantics. `effective_from` marks the first period the report
/// applies to; it equals `key` unless the publisher states otherwise (e.g. a
/// rate "vigente desde" an earlier date).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Period the observation is for.
    pub key: PeriodKey,
    /// Reported value.
    pub value: f64,
    /// First period the reported value applies to.
    pub effective_from: PeriodKey,
}

impl Observation {
    /// Creates an observation that applies from its own key.
    #[must_use]
    pub const fn new(key: PeriodKey, value: f64) -> Self {
        Self {
            key,
            value,
            effective_from: key,
        }
    }

    /// Sets the first period the value applies to.
    #[must_use]
    pub const fn with_effective_from(mut self, effective_from: PeriodKey) -> Self {
        self.effective_from = effective_from;
        self
    }

    /// Returns true if the observation applies to periods before its key.
    #[must_use]
    pub fn is_retroactive(&self) -> bool {
        self.effective_from < self.key
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.key, self.value)?;
        if self.effective_from != self.key {
            write!(f, " (effective from {})", self.effective_from)?;
        }
        Ok(())
    }
}
