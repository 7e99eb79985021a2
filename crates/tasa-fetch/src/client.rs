//! HTTP client for publisher pages and APIs.

use reqwest::Client;
use std::time::Duration;
use tasa_types::FetchError;
use tracing::debug;

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Connection timeout (separate from request timeout).
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Skip TLS certificate verification.
    pub insecure_tls: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("tasa/{}", env!("CARGO_PKG_VERSION")),
            insecure_tls: false,
        }
    }
}

impl ClientConfig {
    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Relaxes TLS verification.
    #[must_use]
    pub const fn with_insecure_tls(mut self, insecure_tls: bool) -> Self {
        self.insecure_tls = insecure_tls;
        self
    }
}

/// HTTP client performing one GET per call, without retries.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.insecure_tls)
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Client {
                reason: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches `url` and returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Timeout`] when the timeout elapses,
    /// [`FetchError::Status`] for a non-success status, and
    /// [`FetchError::Request`] or [`FetchError::Body`] for transport failures.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, insecure = self.config.insecure_tls, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.request_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                self.request_error(url, &e)
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;
        debug!(url, status = status.as_u16(), bytes = body.len(), "response");
        Ok(body)
    }

    /// Maps a send failure to the fetch taxonomy.
    fn request_error(&self, url: &str, error: &reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: self.config.timeout.as_secs(),
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }
}
