//! Load, observe, classify, fill and persist one series.

use tasa_model::{FillError, GapFiller, RateModel};
use tasa_store::SeriesStore;
use tasa_types::{
    GapFill, KeyError, ModelKind, Observation, ObserveContext, PeriodKey, Semantics, SeriesDef, Source,
    TimeSeries, round_to,
};
use tracing::{debug, info, warn};

use crate::{Diff, ReconcileError, RunReport, RunState};

/// Result of classifying one observation against a stored series.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Leave the store as it is.
    Noop {
        /// Why nothing changes.
        reason: String,
    },
    /// Replace the store with `series`.
    Update {
        /// [`RunState::Appended`] or [`RunState::Rewritten`].
        outcome: RunState,
        /// The full updated series.
        series: TimeSeries,
        /// Changes relative to the loaded series.
        diff: Diff,
    },
}

impl Decision {
    /// Returns the classification state.
    #[must_use]
    pub const fn outcome(&self) -> RunState {
        match self {
            Self::Noop { .. } => RunState::Noop,
            Self::Update { outcome, .. } => *outcome,
        }
    }

    fn noop(reason: impl Into<String>) -> Self {
        Self::Noop {
            reason: reason.into(),
        }
    }

    fn update(outcome: RunState, before: &TimeSeries, series: TimeSeries) -> Self {
        let diff = Diff::between(before, &series);
        Self::Update {
            outcome,
            series,
            diff,
        }
    }
}

/// Decides how `obs` changes `series` under `def`.
///
/// Works on a copy; `series` is never modified.
///
/// # Errors
///
/// Returns [`ReconcileError::Observation`] if the observation's keys do not
/// have the series granularity, and [`ReconcileError::MissingAnchor`] when a
/// rate series has no stored value to extrapolate from.
pub fn classify(
    def: &SeriesDef,
    series: &TimeSeries,
    obs: Observation,
) -> Result<Decision, ReconcileError> {
    let granularity = def.granularity();
    let observation_error = |source: KeyError| ReconcileError::Observation {
        series: def.id().to_string(),
        source,
    };
    obs.key.expect_granularity(granularity).map_err(observation_error)?;
    obs.effective_from
        .expect_granularity(granularity)
        .map_err(observation_error)?;

    match def.semantics() {
        Semantics::Level => classify_level(def, series, obs),
        Semantics::Rate { model } => classify_rate(def, model, series, obs),
    }
}

fn classify_level(
    def: &SeriesDef,
    series: &TimeSeries,
    obs: Observation,
) -> Result<Decision, ReconcileError> {
    let precision = def.precision();
    let target = obs.key;
    let value = round_to(obs.value, precision);

    let Some((latest, latest_value)) = series.latest() else {
        debug!(series = def.id(), %target, "bootstrapping empty series");
        let mut updated = series.clone();
        updated.insert(target, value);
        return Ok(Decision::update(RunState::Appended, series, updated));
    };

    if let Some(stored) = series.get(&target) {
        if round_to(stored, precision) == value {
            return Ok(Decision::noop(format!("{target} already stored as {value}")));
        }
        if !def.is_revisable() {
            warn!(
                series = def.id(),
                %target,
                stored,
                observed = value,
                "publisher reports a different value for a stored period; keeping stored value"
            );
            return Ok(Decision::noop(format!(
                "{target} stored as {stored}, publisher now reports {value} (series not revisable)"
            )));
        }
        let mut updated = series.clone();
        updated.insert(target, value);
        return Ok(Decision::update(RunState::Rewritten, series, updated));
    }

    let mut updated = series.clone();
    if target < latest {
        updated.insert(target, value);
        return Ok(Decision::update(RunState::Rewritten, series, updated));
    }

    match def.gap_fill() {
        GapFill::Carry => {
            let filler = GapFiller::new(RateModel::DirectCopy, precision);
            let plan = filler
                .fill_to_with_target_value((latest, latest_value), target, value)
                .map_err(|e| ReconcileError::fill_error(def.id(), e))?;
            updated.extend(plan.into_entries());
        }
        GapFill::Skip => {
            updated.insert(target, value);
        }
    }
    Ok(Decision::update(RunState::Appended, series, updated))
}

fn classify_rate(
    def: &SeriesDef,
    kind: ModelKind,
    series: &TimeSeries,
    obs: Observation,
) -> Result<Decision, ReconcileError> {
    let target = obs.key;
    let eff = obs.effective_from;
    let missing_anchor = |expected: PeriodKey| ReconcileError::MissingAnchor {
        series: def.id().to_string(),
        expected,
    };

    let Some((latest, _)) = series.latest() else {
        return Err(missing_anchor(target.pred().unwrap_or(target)));
    };

    if target < latest {
        info!(series = def.id(), %target, %latest, "stale observation");
        return Ok(Decision::noop(format!(
            "observation for {target} is older than latest stored {latest}"
        )));
    }
    if eff > target {
        return Ok(Decision::noop(format!(
            "rate applies from {eff}, nothing to process until then"
        )));
    }

    let start = if eff <= latest {
        eff
    } else {
        latest
            .succ()
            .ok_or_else(|| ReconcileError::fill_error(def.id(), FillError::OutOfRange(latest)))?
    };
    if start > target {
        return Ok(Decision::noop(format!(
            "rate applies from {eff}, nothing to process until then"
        )));
    }

    let anchor = series
        .last_before(&start)
        .ok_or_else(|| missing_anchor(start.pred().unwrap_or(start)))?;

    let filler = GapFiller::new(RateModel::from_kind(kind, obs.value), def.precision());
    let plan = filler
        .fill_to(anchor, target)
        .map_err(|e| ReconcileError::fill_error(def.id(), e))?;

    debug!(
        series = def.id(),
        anchor = %anchor.0,
        %start,
        %target,
        model = %filler.model(),
        "regenerating"
    );

    let mut updated = series.clone();
    // Everything from `start` on is regenerated by the current rate.
    drop(updated.split_off(&start));
    updated.extend(plan.into_entries());

    let diff = Diff::between(series, &updated);
    if diff.is_empty() {
        return Ok(Decision::noop(format!("values through {target} already current")));
    }
    let outcome = if diff.touches_existing() {
        RunState::Rewritten
    } else {
        RunState::Appended
    };
    Ok(Decision::Update {
        outcome,
        series: updated,
        diff,
    })
}

/// Runs reconciliation for one series against its store.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    def: &'a SeriesDef,
    store: &'a SeriesStore,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler for `def` persisted in `store`.
    #[must_use]
    pub const fn new(def: &'a SeriesDef, store: &'a SeriesStore) -> Self {
        Self {
            def,
            store,
            dry_run: false,
        }
    }

    /// Classifies without saving.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs load, observe, classify and (at most one) save.
    ///
    /// Never panics on a failed step: the returned report ends in
    /// [`RunState::Failed`] and carries the error.
    pub async fn run(&self, source: &dyn Source, ctx: &ObserveContext) -> RunReport {
        let id = self.def.id();
        let mut report = RunReport::new(id, self.dry_run);

        if let Err(err) = self.drive(source, ctx, &mut report).await {
            warn!(series = id, stage = %err.stage(), error = %err, "run failed");
            report.transition(RunState::Failed);
            report.error = Some(err);
        }
        report
    }

    async fn drive(
        &self,
        source: &dyn Source,
        ctx: &ObserveContext,
        report: &mut RunReport,
    ) -> Result<(), ReconcileError> {
        let id = self.def.id();

        let series = self.store.load().map_err(|source| ReconcileError::Load {
            series: id.to_string(),
            source,
        })?;
        report.transition(RunState::Loaded);
        info!(
            series = id,
            entries = series.len(),
            latest = ?SeriesStore::latest(&series).map(|(k, _)| k.to_string()),
            "loaded"
        );

        let obs = source
            .observe(ctx)
            .await
            .map_err(|e| ReconcileError::source_error(id, e))?;
        report.transition(RunState::Fetched);
        report.observation = Some(obs);
        info!(series = id, source = source.name(), observation = %obs, "fetched");

        match classify(self.def, &series, obs)? {
            Decision::Noop { reason } => {
                report.transition(RunState::Noop);
                info!(series = id, %reason, "noop");
                report.reason = Some(reason);
            }
            Decision::Update {
                outcome,
                series: updated,
                diff,
            } => {
                report.transition(outcome);
                report.diff = diff;
                info!(
                    series = id,
                    state = %outcome,
                    added = diff.added,
                    changed = diff.changed,
                    removed = diff.removed,
                    "classified"
                );
                if self.dry_run {
                    info!(series = id, "dry run, not saving");
                    return Ok(());
                }
                self.store
                    .save(&updated)
                    .map_err(|source| ReconcileError::Persist {
                        series: id.to_string(),
                        source,
                    })?;
                report.transition(RunState::Persisted);
                info!(series = id, path = %self.store.path().display(), "persisted");
            }
        }
        Ok(())
    }
}
