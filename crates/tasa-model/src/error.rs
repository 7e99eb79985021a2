//! Gap filling errors.

use tasa_types::PeriodKey;
use thiserror::Error;

/// Errors raised while planning a fill.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FillError {
    /// The model needs a value for the period right before the target.
    #[error("Missing anchor: expected a stored value for {expected}")]
    MissingAnchor {
        /// The period that must be present.
        expected: PeriodKey,
    },

    /// Anchor and target have different granularities.
    #[error("Cannot fill from {anchor} to {target}: granularities differ")]
    GranularityMismatch {
        /// The anchor key.
        anchor: PeriodKey,
        /// The target key.
        target: PeriodKey,
    },

    /// The calendar ran out before reaching the target.
    #[error("Period after {0} is out of range")]
    OutOfRange(PeriodKey),
}
