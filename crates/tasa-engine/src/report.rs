//! What a run did.

use std::collections::BTreeSet;

use tasa_types::{Observation, PeriodKey, PeriodRange, TimeSeries};

use crate::{ReconcileError, RunState};

/// Entry-level difference between a loaded series and its updated copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diff {
    /// Keys present only in the updated series.
    pub added: usize,
    /// Keys present in both with different values.
    pub changed: usize,
    /// Keys present only in the loaded series.
    pub removed: usize,
    /// Earliest affected key.
    pub first: Option<PeriodKey>,
    /// Latest affected key.
    pub last: Option<PeriodKey>,
}

impl Diff {
    /// Compares `before` with `after`.
    #[must_use]
    pub fn between(before: &TimeSeries, after: &TimeSeries) -> Self {
        let keys: BTreeSet<PeriodKey> = before.keys().chain(after.keys()).copied().collect();
        let mut diff = Self::default();
        for key in keys {
            let affected = match (before.get(&key), after.get(&key)) {
                (None, Some(_)) => {
                    diff.added += 1;
                    true
                }
                (Some(_), None) => {
                    diff.removed += 1;
                    true
                }
                (Some(old), Some(new)) if old != new => {
                    diff.changed += 1;
                    true
                }
                _ => false,
            };
            if affected {
                diff.first.get_or_insert(key);
                diff.last = Some(key);
            }
        }
        diff
    }

    /// Returns true if nothing differs.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.added == 0 && self.changed == 0 && self.removed == 0
    }

    /// Returns the range from the first to the last affected key.
    #[must_use]
    pub fn span(&self) -> Option<PeriodRange> {
        match (self.first, self.last) {
            (Some(start), Some(end)) => PeriodRange::new(start, end).ok(),
            _ => None,
        }
    }

    /// Returns true if a stored entry was changed or removed.
    #[must_use]
    pub const fn touches_existing(&self) -> bool {
        self.changed > 0 || self.removed > 0
    }
}

/// Record of one reconciliation run.
#[derive(Debug)]
pub struct RunReport {
    /// Series identifier.
    pub series: String,
    /// Final state.
    pub state: RunState,
    /// Every state the run went through, in order.
    pub trail: Vec<RunState>,
    /// The observation the run worked from, once fetched.
    pub observation: Option<Observation>,
    /// Entry-level changes, empty for no-ops.
    pub diff: Diff,
    /// Why nothing changed, for no-ops.
    pub reason: Option<String>,
    /// Whether saving was skipped on purpose.
    pub dry_run: bool,
    /// What stopped the run, for failures.
    pub error: Option<ReconcileError>,
}

impl RunReport {
    pub(crate) fn new(series: impl Into<String>, dry_run: bool) -> Self {
        Self {
            series: series.into(),
            state: RunState::Loaded,
            trail: Vec::new(),
            observation: None,
            diff: Diff::default(),
            reason: None,
            dry_run,
            error: None,
        }
    }

    pub(crate) fn transition(&mut self, state: RunState) {
        debug_assert!(
            !self.state.is_finished(),
            "{state} after finished state {}",
            self.state
        );
        self.state = state;
        self.trail.push(state);
    }

    /// Returns the classification outcome, if the run got that far.
    #[must_use]
    pub fn outcome(&self) -> Option<RunState> {
        self.trail.iter().copied().find(RunState::is_outcome)
    }

    /// Returns true if the run saved the series.
    #[must_use]
    pub fn persisted(&self) -> bool {
        self.state == RunState::Persisted
    }

    /// Returns true if the run failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.state == RunState::Failed
    }

    /// Splits off the error of a failed run.
    ///
    /// # Errors
    ///
    /// Returns the [`ReconcileError`] that stopped the run.
    pub fn into_result(mut self) -> Result<Self, ReconcileError> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        if let Some(err) = &self.error {
            return format!("{}: failed at {}: {err}", self.series, err.stage());
        }

        let suffix = if self.dry_run { " (dry run)" } else { "" };
        match self.outcome() {
            Some(RunState::Noop) => format!(
                "{}: unchanged, {}{suffix}",
                self.series,
                self.reason.as_deref().unwrap_or("nothing to do")
            ),
            Some(outcome) => {
                let span = self
                    .diff
                    .span()
                    .map_or_else(String::new, |span| format!(" [{span}]"));
                format!(
                    "{}: {outcome}, {} added, {} changed, {} removed{span}{suffix}",
                    self.series, self.diff.added, self.diff.changed, self.diff.removed
                )
            }
            None => format!("{}: {}", self.series, self.state),
        }
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasa_types::Granularity;

    fn day(s: &str) -> PeriodKey {
        PeriodKey::parse(s, Granularity::Daily).unwrap()
    }

    #[test]
    fn test_diff_counts_and_span() {
        let before: TimeSeries = [
            (day("2025-07-17"), 99.9),
            (day("2025-07-18"), 100.0),
            (day("2025-07-19"), 100.1),
        ]
        .into_iter()
        .collect();
        let after: TimeSeries = [
            (day("2025-07-17"), 99.9),
            (day("2025-07-18"), 100.0),
            (day("2025-07-19"), 100.2),
            (day("2025-07-20"), 100.4),
        ]
        .into_iter()
        .collect();

        let diff = Diff::between(&before, &after);
        assert_eq!((diff.added, diff.changed, diff.removed), (1, 1, 0));
        assert_eq!(diff.first, Some(day("2025-07-19")));
        assert_eq!(diff.last, Some(day("2025-07-20")));
        assert!(diff.touches_existing());
        assert!(Diff::between(&before, &before).is_empty());
    }

    #[test]
    fn test_summary_lines() {
        let mut report = RunReport::new("activa", false);
        report.transition(RunState::Loaded);
        report.transition(RunState::Fetched);
        report.transition(RunState::Appended);
        report.transition(RunState::Persisted);
        report.diff = Diff {
            added: 2,
            first: Some(day("2025-07-19")),
            last: Some(day("2025-07-20")),
            ..Diff::default()
        };
        assert_eq!(
            report.summary(),
            "activa: appended, 2 added, 0 changed, 0 removed [2025-07-19..=2025-07-20]"
        );

        let mut noop = RunReport::new("cer", true);
        noop.transition(RunState::Noop);
        noop.reason = Some("2025-07-19 already stored".to_string());
        assert_eq!(noop.summary(), "cer: unchanged, 2025-07-19 already stored (dry run)");
    }

    #[test]
    fn test_span_of_single_key() {
        let diff = Diff {
            added: 1,
            first: Some(day("2025-07-20")),
            last: Some(day("2025-07-20")),
            ..Diff::default()
        };
        assert_eq!(diff.span().map(|s| s.to_string()).as_deref(), Some("2025-07-20"));
        assert_eq!(Diff::default().span(), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "after finished state persisted")]
    fn test_finished_run_accepts_no_transition() {
        let mut report = RunReport::new("activa", false);
        report.transition(RunState::Fetched);
        report.transition(RunState::Appended);
        report.transition(RunState::Persisted);
        report.transition(RunState::Failed);
    }
}
