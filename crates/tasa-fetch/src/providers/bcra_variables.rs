//! BCRA "Principales variables" table.

use async_trait::async_trait;
use chrono::NaiveDate;
use tasa_types::{Granularity, Observation, ObserveContext, ParseError, Source, SourceError};
use tracing::info;

use crate::html::{cells, slice_between_ci, tag_blocks};
use crate::parse::{parse_decimal, parse_dmy};
use crate::strategy::{Strategy, first_match};
use crate::url::BCRA_VARIABLES_URL;
use crate::HttpClient;

const PROVIDER: &str = "bcra_variables";

/// One row of the variables table, chosen by label fragments.
///
/// Rows look like `[label, DD/MM/YYYY, value]`; the observation is keyed by
/// the row's date at the series granularity.
#[derive(Debug, Clone)]
pub struct BcraVariables {
    client: HttpClient,
    url: String,
    label: Vec<String>,
    granularity: Granularity,
}

impl BcraVariables {
    /// Creates the adapter for the row whose first cell contains every
    /// fragment of `label`.
    #[must_use]
    pub fn new(client: HttpClient, label: Vec<String>, granularity: Granularity) -> Self {
        Self {
            client,
            url: BCRA_VARIABLES_URL.to_string(),
            label,
            granularity,
        }
    }

    /// Overrides the page URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

struct RowQuery<'a> {
    html: &'a str,
    label: &'a [String],
}

fn label_matches(cell: &str, label: &[String]) -> bool {
    let cell = cell.to_lowercase();
    !label.is_empty() && label.iter().all(|fragment| cell.contains(&fragment.to_lowercase()))
}

fn first_matching_row(rows: Vec<&str>, label: &[String]) -> Option<(NaiveDate, f64)> {
    rows.into_iter().find_map(|row| {
        let cells = cells(row);
        if cells.len() < 3 || !label_matches(&cells[0], label) {
            return None;
        }
        Some((parse_dmy(&cells[1]).ok()?, parse_decimal(&cells[2]).ok()?))
    })
}

fn first_table_body(query: &RowQuery<'_>) -> Option<(NaiveDate, f64)> {
    let table = slice_between_ci(query.html, "<table", "</table>")?;
    let body = slice_between_ci(table, "<tbody", "</tbody>").unwrap_or(table);
    first_matching_row(tag_blocks(body, "tr"), query.label)
}

fn any_table_row(query: &RowQuery<'_>) -> Option<(NaiveDate, f64)> {
    first_matching_row(tag_blocks(query.html, "tr"), query.label)
}

/// Finds the dated value in the row labelled by `label`.
///
/// # Errors
///
/// Returns [`ParseError::NotFound`] if no row matches with a valid date and
/// number.
pub fn parse_variable(html: &str, label: &[String]) -> Result<(NaiveDate, f64), ParseError> {
    let strategies = [
        Strategy::new("first table body", first_table_body),
        Strategy::new("any table row", any_table_row),
    ];
    first_match(
        PROVIDER,
        &format!("row '{}'", label.join(" + ")),
        &RowQuery { html, label },
        &strategies,
    )
}

#[async_trait]
impl Source for BcraVariables {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn observe(&self, _ctx: &ObserveContext) -> Result<Observation, SourceError> {
        let html = self.client.get_text(&self.url).await?;
        let (date, value) = parse_variable(&html, &self.label)?;
        let key = self.granularity.key_for(date);
        info!(provider = PROVIDER, %key, value, "observed");
        Ok(Observation::new(key, value))
    }
}
