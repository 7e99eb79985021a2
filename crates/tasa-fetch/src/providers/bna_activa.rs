//! Banco Nación lending rate.

use async_trait::async_trait;
use chrono::NaiveDate;
use tasa_types::{Observation, ObserveContext, ParseError, PeriodKey, Source, SourceError};
use tracing::{info, warn};

use crate::html::{tag_blocks, text_of};
use crate::parse::{find_date_after, find_percent};
use crate::strategy::{Strategy, first_match};
use crate::url::BNA_ACTIVA_URL;
use crate::HttpClient;

const PROVIDER: &str = "bna_activa";
const TNA_MARKER: &str = "T.N.A.";
const VIGENCIA_MARKER: &str = "Vigente desde";

/// The rate as published, before it is keyed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivaQuote {
    /// Nominal annual rate, in percent.
    pub tna: f64,
    /// Date the rate applies from, when the page states it.
    pub effective_from: Option<NaiveDate>,
}

/// Current T.N.A. lending rate.
///
/// The page only shows the rate in force, so the observation is keyed on the
/// run date and marked effective from the published "vigente desde" date.
#[derive(Debug, Clone)]
pub struct BnaActiva {
    client: HttpClient,
    url: String,
}

impl BnaActiva {
    /// Creates the adapter.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            url: BNA_ACTIVA_URL.to_string(),
        }
    }

    /// Overrides the page URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

fn list_item(html: &str) -> Option<f64> {
    tag_blocks(html, "li")
        .into_iter()
        .map(text_of)
        .filter(|text| text.contains(TNA_MARKER))
        .find_map(|text| find_percent(&text))
}

fn page_text(html: &str) -> Option<f64> {
    let text = text_of(html);
    let at = text.find(TNA_MARKER)?;
    find_percent(&text[at..])
}

/// Extracts the T.N.A. and its vigencia date from the page.
///
/// # Errors
///
/// Returns [`ParseError::NotFound`] if no T.N.A. percentage is present.
pub fn parse_activa(html: &str) -> Result<ActivaQuote, ParseError> {
    let strategies = [
        Strategy::new("list item", list_item),
        Strategy::new("page text", page_text),
    ];
    let tna = first_match(PROVIDER, "T.N.A. percentage", html, &strategies)?;
    let effective_from = find_date_after(&text_of(html), VIGENCIA_MARKER);
    Ok(ActivaQuote {
        tna,
        effective_from,
    })
}

#[async_trait]
impl Source for BnaActiva {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn observe(&self, ctx: &ObserveContext) -> Result<Observation, SourceError> {
        let html = self.client.get_text(&self.url).await?;
        let quote = parse_activa(&html)?;

        let key = PeriodKey::day(ctx.today);
        let effective_from = quote.effective_from.map_or_else(
            || {
                warn!(provider = PROVIDER, "no vigencia date on page, using run date");
                key
            },
            PeriodKey::day,
        );
        info!(provider = PROVIDER, tna = quote.tna, %effective_from, "observed");
        Ok(Observation::new(key, quote.tna).with_effective_from(effective_from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const PAGE: &str = r#"<div class="tasas">
        <ul>
          <li>Tasa Efectiva Anual Vencida (T.E.A.): 43,39%</li>
          <li>Tasa Nominal Anual (T.N.A.) (30 días) 36,50%</li>
        </ul>
        <p>Vigente desde  <strong>01/07/2025</strong></p>
    </div>"#;

    #[test]
    fn test_parse_activa() {
        let quote = parse_activa(PAGE).unwrap();
        assert_eq!(quote.tna, 36.5);
        assert_eq!(quote.effective_from, NaiveDate::from_ymd_opt(2025, 7, 1));
    }

    #[test]
    fn test_parse_activa_without_list() {
        let page = "<p>Tasa activa T.N.A. 35,25%</p>";
        let quote = parse_activa(page).unwrap();
        assert_eq!(quote.tna, 35.25);
        assert_eq!(quote.effective_from, None);
    }

    #[test]
    fn test_parse_activa_missing() {
        let err = parse_activa("<li>T.E.A. 43,39%</li>").unwrap_err();
        assert!(matches!(err, ParseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_observe_keys_on_run_date() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/bna");
                then.status(200).body(PAGE);
            })
            .await;

        let source = BnaActiva::new(HttpClient::with_defaults().unwrap()).with_url(server.url("/bna"));
        let today = NaiveDate::from_ymd_opt(2025, 7, 19).unwrap();
        let obs = source.observe(&ObserveContext::new(today)).await.unwrap();

        assert_eq!(obs.key, PeriodKey::day(today));
        assert_eq!(obs.value, 36.5);
        assert_eq!(
            obs.effective_from,
            PeriodKey::day(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
        );
    }
}
