//! Minimum wage (Salario Mínimo Vital y Móvil).

use async_trait::async_trait;
use tasa_types::{Observation, ObserveContext, ParseError, PeriodKey, Source, SourceError};
use tracing::info;

use crate::html::{text_of, to_lowercase_fast};
use crate::parse::{parse_decimal, parse_month_year};
use crate::strategy::{Strategy, first_match};
use crate::url::SMVM_URL;
use crate::HttpClient;

const PROVIDER: &str = "smvm";
const HEADING: &str = "salario mínimo vital y móvil";

/// Current minimum wage, shown as `$ 317.800 ... (Julio 2025)`.
#[derive(Debug, Clone)]
pub struct Smvm {
    client: HttpClient,
    url: String,
}

impl Smvm {
    /// Creates the adapter.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            url: SMVM_URL.to_string(),
        }
    }

    /// Overrides the page URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// First `$ amount` followed later by `(Month YYYY)` in `text`.
fn amount_with_period(text: &str) -> Option<(PeriodKey, f64)> {
    let mut rest = text;
    while let Some(dollar) = rest.find('$') {
        rest = &rest[dollar + 1..];
        let amount: String = rest
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
            .collect();
        let Ok(value) = parse_decimal(&amount) else {
            continue;
        };
        let open = rest.find('(')?;
        let close = rest[open..].find(')')? + open;
        if let Ok(key) = parse_month_year(&rest[open + 1..close]) {
            return Some((key, value));
        }
    }
    None
}

fn heading_block(html: &str) -> Option<(PeriodKey, f64)> {
    let text = text_of(html);
    let at = to_lowercase_fast(&text).find(HEADING)?;
    amount_with_period(&text[at..])
}

fn whole_page(html: &str) -> Option<(PeriodKey, f64)> {
    amount_with_period(&text_of(html))
}

/// Finds the minimum wage and the month it applies to.
///
/// # Errors
///
/// Returns [`ParseError::NotFound`] if no amount with a month is present.
pub fn parse_smvm(html: &str) -> Result<(PeriodKey, f64), ParseError> {
    let strategies = [
        Strategy::new("heading block", heading_block),
        Strategy::new("whole page", whole_page),
    ];
    first_match(PROVIDER, "SMVM amount and month", html, &strategies)
}

#[async_trait]
impl Source for Smvm {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn observe(&self, _ctx: &ObserveContext) -> Result<Observation, SourceError> {
        let html = self.client.get_text(&self.url).await?;
        let (key, value) = parse_smvm(&html)?;
        info!(provider = PROVIDER, %key, value, "observed");
        Ok(Observation::new(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_smvm() {
        let page = r#"<section>
            <div class="panel"><h4>Prestación por desempleo</h4><p>$ 150.000 (Julio 2025)</p></div>
            <div class="panel">
              <h4>Salario M&iacute;nimo Vital y M&oacute;vil</h4>
              <p class="valor">$ 317.800</p>
              <small>mensual (Julio 2025)</small>
            </div>
        </section>"#;
        let (key, value) = parse_smvm(page).unwrap();
        assert_eq!(key, PeriodKey::month(2025, 7).unwrap());
        assert_eq!(value, 317_800.0);
    }

    #[test]
    fn test_parse_smvm_falls_back_to_page() {
        let page = "<div>SMVM vigente: $ 296.832 (Abril 2025)</div>";
        let (key, value) = parse_smvm(page).unwrap();
        assert_eq!(key, PeriodKey::month(2025, 4).unwrap());
        assert_eq!(value, 296_832.0);
    }

    #[test]
    fn test_parse_smvm_missing_period() {
        let page = "<h4>Salario Mínimo Vital y Móvil</h4><p>$ 317.800</p>";
        assert!(matches!(parse_smvm(page), Err(ParseError::NotFound { .. })));
    }
}
