//! RIPTE wage index table.

use async_trait::async_trait;
use tasa_types::{Observation, ObserveContext, ParseError, PeriodKey, Source, SourceError};
use tracing::info;

use crate::html::{cells, slice_between_ci, tag_blocks};
use crate::parse::{parse_decimal, parse_month_year};
use crate::strategy::{Strategy, first_match};
use crate::url::RIPTE_URL;
use crate::HttpClient;

const PROVIDER: &str = "ripte";

/// Latest RIPTE value: the first body row of the publication table,
/// `[Mayo/2025, ..., 163.299,84]`.
#[derive(Debug, Clone)]
pub struct Ripte {
    client: HttpClient,
    url: String,
}

impl Ripte {
    /// Creates the adapter.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            url: RIPTE_URL.to_string(),
        }
    }

    /// Overrides the page URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

fn row_value(row: &str) -> Option<(PeriodKey, f64)> {
    let cells = cells(row);
    let first = cells.first()?;
    let last = cells.last()?;
    if cells.len() < 2 {
        return None;
    }
    Some((parse_month_year(first).ok()?, parse_decimal(last).ok()?))
}

fn first_body_row(html: &str) -> Option<(PeriodKey, f64)> {
    let table = slice_between_ci(html, "<table", "</table>")?;
    let body = slice_between_ci(table, "<tbody", "</tbody>")?;
    tag_blocks(body, "tr").first().and_then(|row| row_value(row))
}

fn first_dated_row(html: &str) -> Option<(PeriodKey, f64)> {
    tag_blocks(html, "tr").into_iter().find_map(row_value)
}

/// Finds the latest month and value in the RIPTE table.
///
/// # Errors
///
/// Returns [`ParseError::NotFound`] if no row carries a month and a value.
pub fn parse_ripte(html: &str) -> Result<(PeriodKey, f64), ParseError> {
    let strategies = [
        Strategy::new("first body row", first_body_row),
        Strategy::new("first dated row", first_dated_row),
    ];
    first_match(PROVIDER, "latest RIPTE row", html, &strategies)
}

#[async_trait]
impl Source for Ripte {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn observe(&self, _ctx: &ObserveContext) -> Result<Observation, SourceError> {
        let html = self.client.get_text(&self.url).await?;
        let (key, value) = parse_ripte(&html)?;
        info!(provider = PROVIDER, %key, value, "observed");
        Ok(Observation::new(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_body_row() {
        let page = r#"<table class="table">
            <thead><tr><th>Período</th><th>Variación</th><th>RIPTE</th></tr></thead>
            <tbody>
              <tr><td>Mayo/2025</td><td>2,1%</td><td>163.299,84</td></tr>
              <tr><td>Abril/2025</td><td>3,0%</td><td>159.931,60</td></tr>
            </tbody>
        </table>"#;
        let (key, value) = parse_ripte(page).unwrap();
        assert_eq!(key, PeriodKey::month(2025, 5).unwrap());
        assert_eq!(value, 163_299.84);
    }

    #[test]
    fn test_parse_table_without_body() {
        let page = r#"<table>
            <tr><th>Período</th><th>RIPTE</th></tr>
            <tr><td>Setiembre/2024</td><td>1.200,50</td></tr>
        </table>"#;
        let (key, value) = parse_ripte(page).unwrap();
        assert_eq!(key, PeriodKey::month(2024, 9).unwrap());
        assert_eq!(value, 1200.5);
    }

    #[test]
    fn test_parse_ripte_missing() {
        assert!(matches!(
            parse_ripte("<p>En mantenimiento</p>"),
            Err(ParseError::NotFound { .. })
        ));
    }
}
