//! Reconciliation errors.

use tasa_model::FillError;
use tasa_store::StoreError;
use tasa_types::{FetchError, KeyError, ParseError, PeriodKey, SourceError};
use thiserror::Error;

use crate::Stage;

/// Errors that end a reconciliation run.
///
/// None of these are retried. The store is left untouched by every variant
/// except [`ReconcileError::Persist`], where the atomic save guarantees the
/// previous file survives.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The stored series could not be read.
    #[error("{series}: {source}")]
    Load {
        /// Series identifier.
        series: String,
        /// Store failure.
        source: StoreError,
    },

    /// The publisher could not be reached.
    #[error("{series}: {source}")]
    Fetch {
        /// Series identifier.
        series: String,
        /// Transport failure.
        source: FetchError,
    },

    /// The publisher's content could not be interpreted.
    #[error("{series}: {source}")]
    Parse {
        /// Series identifier.
        series: String,
        /// Content failure.
        source: ParseError,
    },

    /// The observation's keys do not fit the series.
    #[error("{series}: observation rejected: {source}")]
    Observation {
        /// Series identifier.
        series: String,
        /// Key failure.
        source: KeyError,
    },

    /// There is no stored value to extrapolate from.
    #[error("{series}: missing anchor, expected a stored value for {expected}")]
    MissingAnchor {
        /// Series identifier.
        series: String,
        /// The period that must be present.
        expected: PeriodKey,
    },

    /// Filling failed for another reason.
    #[error("{series}: {source}")]
    Fill {
        /// Series identifier.
        series: String,
        /// Filler failure.
        source: FillError,
    },

    /// The updated series could not be saved.
    #[error("{series}: {source}")]
    Persist {
        /// Series identifier.
        series: String,
        /// Store failure.
        source: StoreError,
    },
}

impl ReconcileError {
    pub(crate) fn source_error(series: &str, err: SourceError) -> Self {
        let series = series.to_string();
        match err {
            SourceError::Fetch(source) => Self::Fetch { series, source },
            SourceError::Parse(source) => Self::Parse { series, source },
        }
    }

    pub(crate) fn fill_error(series: &str, err: FillError) -> Self {
        let series = series.to_string();
        match err {
            FillError::MissingAnchor { expected } => Self::MissingAnchor { series, expected },
            source => Self::Fill { series, source },
        }
    }

    /// Returns the stage the run failed at.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Load { .. } => Stage::Load,
            Self::Fetch { .. } => Stage::Fetch,
            Self::Parse { .. } | Self::Observation { .. } => Stage::Parse,
            Self::MissingAnchor { .. } | Self::Fill { .. } => Stage::Reconcile,
            Self::Persist { .. } => Stage::Persist,
        }
    }

    /// Returns the series the run was for.
    #[must_use]
    pub fn series(&self) -> &str {
        match self {
            Self::Load { series, .. }
            | Self::Fetch { series, .. }
            | Self::Parse { series, .. }
            | Self::Observation { series, .. }
            | Self::MissingAnchor { series, .. }
            | Self::Fill { series, .. }
            | Self::Persist { series, .. } => series,
        }
    }

    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.stage().exit_code()
    }
}
