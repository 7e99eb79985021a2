//! The seam between reconciliation and publishers.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{Observation, SourceError};

/// Run-wide inputs a source may need to build its observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserveContext {
    /// The run date. Sources that publish a rate "as of today" key their
    /// observation on it.
    pub today: NaiveDate,
}

impl ObserveContext {
    /// Creates a context for the given run date.
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

/// A publisher that reports the current observation for one series.
///
/// Implementations perform a single fetch and parse; they never touch the
/// store. Retries, if any, belong to the caller.
#[async_trait]
pub trait Source: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &str;

    /// Fetches and parses the publisher's current value.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Fetch`] when the publisher cannot be reached and
    /// [`SourceError::Parse`] when its content cannot be interpreted.
    async fn observe(&self, ctx: &ObserveContext) -> Result<Observation, SourceError>;
}
