//! Error types shared across tasa crates.

use thiserror::Error;

use crate::Granularity;

/// Errors raised while parsing or combining period keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key string was empty.
    #[error("Empty period key")]
    Empty,

    /// A daily key was not `YYYY-MM-DD`.
    #[error("Invalid date key '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A monthly key was not `mmm-yy`.
    #[error("Invalid month key '{0}', expected mmm-yy (e.g. jul-25)")]
    InvalidMonthKey(String),

    /// The month abbreviation is not one of `ene`..`dic`.
    #[error("Unknown month '{0}'")]
    UnknownMonth(String),

    /// Month number outside `1..=12`.
    #[error("Month {0} out of range")]
    MonthOutOfRange(u32),

    /// Unknown granularity identifier.
    #[error("Unknown granularity '{0}', expected daily or monthly")]
    UnknownGranularity(String),

    /// Key of the wrong granularity for its series.
    #[error("Key '{key}' is not a {expected} key")]
    GranularityMismatch {
        /// The offending key.
        key: String,
        /// The granularity that was expected.
        expected: Granularity,
    },

    /// Range start after range end.
    #[error("Invalid period range: {start} > {end}")]
    InvalidRange {
        /// The start key.
        start: String,
        /// The end key.
        end: String,
    },
}

/// Transport-level failures while reaching a publisher.
///
/// These usually clear up on the next scheduled run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    #[error("Request to {url} failed: {reason}")]
    Request {
        /// Requested URL.
        url: String,
        /// Underlying client error.
        reason: String,
    },

    /// The request exceeded the configured timeout.
    #[error("Request to {url} timed out after {secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout in seconds.
        secs: u64,
    },

    /// The server answered with a non-success status.
    #[error("Request to {url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be read.
    #[error("Failed to read response body from {url}: {reason}")]
    Body {
        /// Requested URL.
        url: String,
        /// Underlying client error.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {reason}")]
    Client {
        /// Underlying client error.
        reason: String,
    },

    /// A derived series could not read the series it copies from.
    #[error("Upstream series '{series}' unavailable: {reason}")]
    Upstream {
        /// Upstream series identifier.
        series: String,
        /// What went wrong.
        reason: String,
    },
}

/// Content-level failures: the page arrived but did not look as expected.
///
/// These usually mean the publisher changed its layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// None of the extraction strategies found the expected content.
    #[error("{provider}: could not find {expected} (tried: {})", .tried.join(", "))]
    NotFound {
        /// Provider that was parsing.
        provider: String,
        /// Human description of what was searched for.
        expected: String,
        /// Names of the strategies attempted, in order.
        tried: Vec<String>,
    },

    /// A numeric cell could not be normalized.
    #[error("Invalid number '{0}'")]
    Number(String),

    /// A date cell could not be parsed.
    #[error("Invalid date '{0}', expected DD/MM/YYYY")]
    Date(String),

    /// A month name was not recognized.
    #[error("Unknown month name '{0}'")]
    Month(String),

    /// A structured (JSON) payload did not match the expected schema.
    #[error("{provider}: unexpected payload: {reason}")]
    Payload {
        /// Provider that was parsing.
        provider: String,
        /// Decoder message.
        reason: String,
    },

    /// An extracted key was invalid.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Error returned by a [`Source`](crate::Source).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The publisher could not be reached.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The publisher's content could not be interpreted.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<KeyError> for SourceError {
    fn from(err: KeyError) -> Self {
        Self::Parse(ParseError::Key(err))
    }
}
