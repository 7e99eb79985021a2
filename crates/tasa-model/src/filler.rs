//! Unit-by-unit extrapolation from an anchor to a target period.

use tasa_types::PeriodKey;

use crate::{FillError, RateModel};

/// What filling from an anchor to a target amounts to.
#[derive(Debug, Clone, PartialEq)]
pub enum FillPlan {
    /// The target is not after the anchor; nothing can be appended and the
    /// caller has to decide whether stored values need rewriting.
    PossibleRewrite,
    /// New entries, one per unit, from `anchor.succ()` through the target.
    Entries(Vec<(PeriodKey, f64)>),
}

impl FillPlan {
    /// Returns the planned entries, empty for [`FillPlan::PossibleRewrite`].
    #[must_use]
    pub fn entries(&self) -> &[(PeriodKey, f64)] {
        match self {
            Self::PossibleRewrite => &[],
            Self::Entries(entries) => entries,
        }
    }

    /// Consumes the plan, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<(PeriodKey, f64)> {
        match self {
            Self::PossibleRewrite => Vec::new(),
            Self::Entries(entries) => entries,
        }
    }
}

/// Generates missing periods from an anchor with a [`RateModel`].
#[derive(Debug, Clone, Copy)]
pub struct GapFiller {
    model: RateModel,
    precision: u32,
}

impl GapFiller {
    /// Creates a filler for the given model and rounding precision.
    #[must_use]
    pub const fn new(model: RateModel, precision: u32) -> Self {
        Self { model, precision }
    }

    /// Returns the model in use.
    #[must_use]
    pub const fn model(&self) -> RateModel {
        self.model
    }

    /// Plans the entries from `anchor` up to and including `target`.
    ///
    /// # Errors
    ///
    /// Returns [`FillError::MissingAnchor`] when the model needs the period
    /// right before `target` and `anchor` is older than that.
    pub fn fill_to(&self, anchor: (PeriodKey, f64), target: PeriodKey) -> Result<FillPlan, FillError> {
        let Some(steps) = self.steps(anchor, target)? else {
            return Ok(FillPlan::PossibleRewrite);
        };
        steps.collect::<Result<Vec<_>, _>>().map(FillPlan::Entries)
    }

    /// Plans entries for a series whose target value is already known.
    ///
    /// Intermediate periods come from the model; the target gets `value`.
    ///
    /// # Errors
    ///
    /// Same as [`fill_to`](Self::fill_to).
    pub fn fill_to_with_target_value(
        &self,
        anchor: (PeriodKey, f64),
        target: PeriodKey,
        value: f64,
    ) -> Result<FillPlan, FillError> {
        let mut plan = self.fill_to(anchor, target)?;
        if let FillPlan::Entries(entries) = &mut plan {
            if let Some(last) = entries.last_mut() {
                last.1 = value;
            }
        }
        Ok(plan)
    }

    /// Returns a lazy iterator over the entries, or `None` when `target` is
    /// not after the anchor.
    ///
    /// # Errors
    ///
    /// Same as [`fill_to`](Self::fill_to).
    pub fn steps(
        &self,
        anchor: (PeriodKey, f64),
        target: PeriodKey,
    ) -> Result<Option<Steps>, FillError> {
        let (anchor_key, anchor_value) = anchor;
        if anchor_key.granularity() != target.granularity() {
            return Err(FillError::GranularityMismatch {
                anchor: anchor_key,
                target,
            });
        }
        if target <= anchor_key {
            return Ok(None);
        }
        if self.model.requires_adjacent_anchor() {
            let expected = target.pred().ok_or(FillError::OutOfRange(target))?;
            if expected != anchor_key {
                return Err(FillError::MissingAnchor { expected });
            }
        }
        Ok(Some(Steps {
            filler: *self,
            key: anchor_key,
            value: anchor_value,
            target,
        }))
    }
}

/// Iterator over filled entries, each computed from the previous output.
#[derive(Debug, Clone)]
pub struct Steps {
    filler: GapFiller,
    key: PeriodKey,
    value: f64,
    target: PeriodKey,
}

impl Iterator for Steps {
    type Item = Result<(PeriodKey, f64), FillError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.key >= self.target {
            return None;
        }
        let Some(next) = self.key.succ() else {
            // Stop after reporting once.
            let last = self.key;
            self.key = self.target;
            return Some(Err(FillError::OutOfRange(last)));
        };
        self.value = self.filler.model.step(self.value, self.filler.precision);
        self.key = next;
        Some(Ok((next, self.value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .key
            .units_until(&self.target)
            .and_then(|units| usize::try_from(units).ok())
            .unwrap_or(0);
        (remaining, Some(remaining))
    }
}
