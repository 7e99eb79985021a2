//! Rate models: how one period's value follows from the previous one.

use serde::{Deserialize, Serialize};
use tasa_types::{ModelKind, round_to};

/// Days per year used by the compounding formulas.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// A rate model bound to a concrete rate.
///
/// Every step rounds to the series precision, and the rounded value feeds the
/// next step. Filling `n` units is therefore not the closed-form
/// `prev * factor^n`; it matches what the series would hold had it been
/// updated once per unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateModel {
    /// `next = prev`.
    DirectCopy,
    /// `next = prev * (1 + rate/100/365)`.
    CompoundDaily {
        /// Nominal annual rate in percent.
        rate: f64,
    },
    /// `next = prev * (1 + rate/100 * period_days/365)`.
    CompoundPeriodic {
        /// Nominal annual rate in percent.
        rate: f64,
        /// Days covered by one unit.
        period_days: u32,
    },
    /// `next = prev * (1 + pct/100)`.
    PercentStepChain {
        /// Period-over-period change in percent.
        pct: f64,
    },
}

impl RateModel {
    /// Binds a configured model kind to an observed rate.
    #[must_use]
    pub const fn from_kind(kind: ModelKind, rate: f64) -> Self {
        match kind {
            ModelKind::DirectCopy => Self::DirectCopy,
            ModelKind::CompoundDaily => Self::CompoundDaily { rate },
            ModelKind::CompoundPeriodic { period_days } => Self::CompoundPeriodic { rate, period_days },
            ModelKind::PercentStepChain => Self::PercentStepChain { pct: rate },
        }
    }

    /// Returns the unbound model kind.
    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        match *self {
            Self::DirectCopy => ModelKind::DirectCopy,
            Self::CompoundDaily { .. } => ModelKind::CompoundDaily,
            Self::CompoundPeriodic { period_days, .. } => ModelKind::CompoundPeriodic { period_days },
            Self::PercentStepChain { .. } => ModelKind::PercentStepChain,
        }
    }

    /// Returns the multiplier applied per unit, before rounding.
    #[must_use]
    pub fn factor(&self) -> f64 {
        match *self {
            Self::DirectCopy => 1.0,
            Self::CompoundDaily { rate } => 1.0 + rate / 100.0 / DAYS_PER_YEAR,
            Self::CompoundPeriodic { rate, period_days } => {
                1.0 + rate / 100.0 * f64::from(period_days) / DAYS_PER_YEAR
            }
            Self::PercentStepChain { pct } => 1.0 + pct / 100.0,
        }
    }

    /// Computes the next unit's value from `prev`, rounded to `precision`.
    #[must_use]
    pub fn step(&self, prev: f64, precision: u32) -> f64 {
        match self {
            Self::DirectCopy => round_to(prev, precision),
            _ => round_to(prev * self.factor(), precision),
        }
    }

    /// Returns true if the model may only extend a series by a single unit
    /// from the immediately preceding period.
    #[must_use]
    pub const fn requires_adjacent_anchor(&self) -> bool {
        matches!(self, Self::PercentStepChain { .. })
    }
}

impl std::fmt::Display for RateModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectCopy => write!(f, "direct copy"),
            Self::CompoundDaily { rate } => write!(f, "daily compounding at {rate}%"),
            Self::CompoundPeriodic { rate, period_days } => {
                write!(f, "{period_days}-day compounding at {rate}%")
            }
            Self::PercentStepChain { pct } => write!(f, "step of {pct}%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compound_daily_step() {
        let model = RateModel::CompoundDaily { rate: 36.5 };
        assert_eq!(model.step(100.0, 6), 100.1);
    }

    #[test]
    fn test_percent_step() {
        let model = RateModel::PercentStepChain { pct: 1.6 };
        assert_eq!(model.step(100.0, 4), 101.6);
    }

    #[test]
    fn test_compound_periodic_step() {
        let model = RateModel::CompoundPeriodic {
            rate: 36.5,
            period_days: 30,
        };
        assert_relative_eq!(model.factor(), 1.03, epsilon = 1e-12);
        assert_eq!(model.step(100.0, 4), 103.0);
    }

    #[test]
    fn test_direct_copy_rounds() {
        assert_eq!(RateModel::DirectCopy.step(163_299.844, 2), 163_299.84);
    }

    #[test]
    fn test_kind_roundtrip() {
        let kinds = [
            ModelKind::DirectCopy,
            ModelKind::CompoundDaily,
            ModelKind::CompoundPeriodic { period_days: 30 },
            ModelKind::PercentStepChain,
        ];
        for kind in kinds {
            assert_eq!(RateModel::from_kind(kind, 10.0).kind(), kind);
        }
    }

    #[test]
    fn test_only_step_chain_needs_adjacent_anchor() {
        assert!(RateModel::PercentStepChain { pct: 1.0 }.requires_adjacent_anchor());
        assert!(!RateModel::CompoundDaily { rate: 1.0 }.requires_adjacent_anchor());
        assert!(!RateModel::DirectCopy.requires_adjacent_anchor());
    }
}
