//! BCRA statistics JSON API.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use tasa_types::{Granularity, Observation, ObserveContext, ParseError, Source, SourceError};
use tracing::info;

use crate::url::{BCRA_API_URL, bcra_api_url};
use crate::HttpClient;

const PROVIDER: &str = "bcra_api";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    results: Vec<ApiPoint>,
}

#[derive(Debug, Deserialize)]
struct ApiPoint {
    fecha: String,
    valor: f64,
}

/// One variable of the BCRA monetary statistics API.
///
/// Requests the last `lookback_days` days and reports the most recent point.
#[derive(Debug, Clone)]
pub struct BcraApi {
    client: HttpClient,
    base_url: String,
    variable: u32,
    lookback_days: u32,
    granularity: Granularity,
}

impl BcraApi {
    /// Creates the adapter for `variable`.
    #[must_use]
    pub fn new(client: HttpClient, variable: u32, lookback_days: u32, granularity: Granularity) -> Self {
        Self {
            client,
            base_url: BCRA_API_URL.to_string(),
            variable,
            lookback_days,
            granularity,
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Returns the most recent `(date, value)` point in an API response.
///
/// # Errors
///
/// Returns [`ParseError::Payload`] if the body is not the expected JSON,
/// [`ParseError::Date`] for an unparseable date, and
/// [`ParseError::NotFound`] if there are no results.
pub fn parse_latest(body: &str) -> Result<(NaiveDate, f64), ParseError> {
    let response: ApiResponse = serde_json::from_str(body).map_err(|e| ParseError::Payload {
        provider: PROVIDER.to_string(),
        reason: e.to_string(),
    })?;

    let mut latest: Option<(NaiveDate, f64)> = None;
    for point in response.results {
        // Dates may carry a time suffix.
        let day = point.fecha.get(..10).unwrap_or(&point.fecha);
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|_| ParseError::Date(point.fecha.clone()))?;
        if latest.is_none_or(|(best, _)| date > best) {
            latest = Some((date, point.valor));
        }
    }

    latest.ok_or_else(|| ParseError::NotFound {
        provider: PROVIDER.to_string(),
        expected: "at least one result".to_string(),
        tried: vec!["results".to_string()],
    })
}

#[async_trait]
impl Source for BcraApi {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn observe(&self, ctx: &ObserveContext) -> Result<Observation, SourceError> {
        let from = ctx.today - Duration::days(i64::from(self.lookback_days));
        let url = bcra_api_url(&self.base_url, self.variable, from, ctx.today);
        let body = self.client.get_text(&url).await?;
        let (date, value) = parse_latest(&body)?;
        let key = self.granularity.key_for(date);
        info!(provider = PROVIDER, variable = self.variable, %key, value, "observed");
        Ok(Observation::new(key, value))
    }
}
