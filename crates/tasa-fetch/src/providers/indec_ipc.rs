//! INDEC consumer price index, month-over-month variation.

use async_trait::async_trait;
use tasa_types::{Observation, ObserveContext, ParseError, PeriodKey, Source, SourceError};
use tracing::info;

use crate::html::{text_of, to_lowercase_fast};
use crate::parse::{find_month_year, find_percent};
use crate::strategy::{Strategy, first_match};
use crate::url::INDEC_IPC_URL;
use crate::HttpClient;

const PROVIDER: &str = "indec_ipc";
const SECTION: &str = "precios al consumidor";
const VARIATION: &str = "variación mensual";

/// Latest monthly CPI variation, in percent, keyed by its month.
#[derive(Debug, Clone)]
pub struct IndecIpc {
    client: HttpClient,
    url: String,
}

impl IndecIpc {
    /// Creates the adapter.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            url: INDEC_IPC_URL.to_string(),
        }
    }

    /// Overrides the page URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Month then percentage, both after `from` in `text`.
fn month_and_percent(text: &str, from: usize) -> Option<(PeriodKey, f64)> {
    let rest = &text[from..];
    let (key, at) = find_month_year(rest)?;
    let pct = find_percent(&rest[at..])?;
    Some((key, pct))
}

fn labelled_variation(html: &str) -> Option<(PeriodKey, f64)> {
    let text = text_of(html);
    let lc = to_lowercase_fast(&text);
    let section = lc.find(SECTION)?;
    let variation = lc[section..].find(VARIATION)? + section;
    month_and_percent(&text, variation)
}

fn section_only(html: &str) -> Option<(PeriodKey, f64)> {
    let text = text_of(html);
    let section = to_lowercase_fast(&text).find(SECTION)?;
    month_and_percent(&text, section)
}

/// Finds the latest monthly variation and the month it belongs to.
///
/// # Errors
///
/// Returns [`ParseError::NotFound`] if the CPI block cannot be located.
pub fn parse_ipc(html: &str) -> Result<(PeriodKey, f64), ParseError> {
    let strategies = [
        Strategy::new("variación mensual", labelled_variation),
        Strategy::new("precios al consumidor", section_only),
    ];
    first_match(PROVIDER, "CPI monthly variation", html, &strategies)
}

#[async_trait]
impl Source for IndecIpc {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn observe(&self, _ctx: &ObserveContext) -> Result<Observation, SourceError> {
        let html = self.client.get_text(&self.url).await?;
        let (key, pct) = parse_ipc(&html)?;
        info!(provider = PROVIDER, %key, pct, "observed");
        Ok(Observation::new(key, pct))
    }
}
