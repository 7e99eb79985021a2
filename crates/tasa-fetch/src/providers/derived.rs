//! Series copied from another stored series.

use async_trait::async_trait;
use tasa_store::SeriesStore;
use tasa_types::{FetchError, Observation, ObserveContext, Source, SourceError};
use tracing::info;

const PROVIDER: &str = "derived";

/// Reports the upstream series' latest value, shifted forward by whole
/// units.
///
/// Reads the upstream file only; never fetches.
#[derive(Debug, Clone)]
pub struct Derived {
    upstream: String,
    store: SeriesStore,
    units: u32,
}

impl Derived {
    /// Creates a source that copies from `store`, shifted by `units`.
    #[must_use]
    pub fn new(upstream: impl Into<String>, store: SeriesStore, units: u32) -> Self {
        Self {
            upstream: upstream.into(),
            store,
            units,
        }
    }

    fn upstream_error(&self, reason: impl Into<String>) -> FetchError {
        FetchError::Upstream {
            series: self.upstream.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Source for Derived {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn observe(&self, _ctx: &ObserveContext) -> Result<Observation, SourceError> {
        let series = self
            .store
            .load()
            .map_err(|e| self.upstream_error(e.to_string()))?;
        let (latest, value) = series
            .latest()
            .ok_or_else(|| self.upstream_error("series is empty"))?;
        let key = latest
            .offset(self.units)
            .ok_or_else(|| self.upstream_error(format!("{latest} + {} is out of range", self.units)))?;

        info!(provider = PROVIDER, upstream = %self.upstream, %latest, %key, value, "observed");
        Ok(Observation::new(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tasa_types::{Granularity, PeriodKey, TimeSeries};
    use tempfile::TempDir;

    fn ctx() -> ObserveContext {
        ObserveContext::new(NaiveDate::from_ymd_opt(2025, 7, 20).unwrap())
    }

    #[tokio::test]
    async fn test_shifts_latest_across_year() {
        let temp_dir = TempDir::new().unwrap();
        let store = SeriesStore::new(temp_dir.path().join("ripte.json"), Granularity::Monthly);
        let series: TimeSeries = [
            (PeriodKey::month(2025, 10).unwrap(), 150_000.0),
            (PeriodKey::month(2025, 11).unwrap(), 163_299.84),
        ]
        .into_iter()
        .collect();
        store.save(&series).unwrap();

        let obs = Derived::new("ripte", store, 2).observe(&ctx()).await.unwrap();
        assert_eq!(obs.key, PeriodKey::month(2026, 1).unwrap());
        assert_eq!(obs.value, 163_299.84);
    }

    #[tokio::test]
    async fn test_missing_upstream() {
        let temp_dir = TempDir::new().unwrap();
        let store = SeriesStore::new(temp_dir.path().join("ripte.json"), Granularity::Monthly);

        let err = Derived::new("ripte", store, 1).observe(&ctx()).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Fetch(FetchError::Upstream { ref series, .. }) if series == "ripte"
        ));
    }

    #[tokio::test]
    async fn test_empty_upstream() {
        let temp_dir = TempDir::new().unwrap();
        let store = SeriesStore::new(temp_dir.path().join("ripte.json"), Granularity::Monthly)
            .with_bootstrap(true);

        let err = Derived::new("ripte", store, 1).observe(&ctx()).await.unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
