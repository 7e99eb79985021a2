//! Reconciliation run states and failure stages.

use serde::{Deserialize, Serialize};

/// State of one reconciliation run.
///
/// A run moves `Loaded → Fetched → {Noop | Appended | Rewritten} → Persisted`.
/// `Failed` can follow `Loaded` or `Fetched` (or happen before anything was
/// loaded) and ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// The stored series was read.
    Loaded,
    /// The source reported an observation.
    Fetched,
    /// Nothing to change; the store is left untouched.
    Noop,
    /// Only new periods were added.
    Appended,
    /// At least one stored period was replaced, inserted in the past, or
    /// removed.
    Rewritten,
    /// The updated series was saved.
    Persisted,
    /// The run stopped with an error.
    Failed,
}

impl RunState {
    /// Returns true if no further transition can follow.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Noop | Self::Persisted | Self::Failed)
    }

    /// Returns true for the three classification outcomes.
    #[must_use]
    pub const fn is_outcome(&self) -> bool {
        matches!(self, Self::Noop | Self::Appended | Self::Rewritten)
    }

    /// Returns the state as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Fetched => "fetched",
            Self::Noop => "noop",
            Self::Appended => "appended",
            Self::Rewritten => "rewritten",
            Self::Persisted => "persisted",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Step of a run an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Reading the stored series.
    Load,
    /// Reaching the publisher.
    Fetch,
    /// Interpreting the publisher's content.
    Parse,
    /// Classifying and filling.
    Reconcile,
    /// Saving the updated series.
    Persist,
}

impl Stage {
    /// Returns the stage as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Fetch => "fetch",
            Self::Parse => "parse",
            Self::Reconcile => "reconcile",
            Self::Persist => "persist",
        }
    }

    /// Returns the process exit code for a run failing at this stage.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Load => 3,
            Self::Fetch => 4,
            Self::Parse => 5,
            Self::Reconcile => 6,
            Self::Persist => 7,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_states() {
        assert!(RunState::Noop.is_finished());
        assert!(RunState::Persisted.is_finished());
        assert!(RunState::Failed.is_finished());
        assert!(!RunState::Appended.is_finished());
        assert!(!RunState::Fetched.is_finished());
    }

    #[test]
    fn test_outcomes() {
        assert!(RunState::Rewritten.is_outcome());
        assert!(RunState::Noop.is_outcome());
        assert!(!RunState::Persisted.is_outcome());
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes: Vec<u8> = [
            Stage::Load,
            Stage::Fetch,
            Stage::Parse,
            Stage::Reconcile,
            Stage::Persist,
        ]
        .iter()
        .map(Stage::exit_code)
        .collect();
        assert_eq!(codes, vec![3, 4, 5, 6, 7]);
    }
}
