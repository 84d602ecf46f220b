//! HTTP transport seam: the trait the fetch strategy talks to, and the
//! reqwest-backed implementation used in production.

use crate::config::Config;
use crate::error::{FetchError, Result};

/// Status and body of a completed HTTP exchange
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl HttpResponse {
    /// Build a response from a status code and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP GET, enabling testability.
///
/// Implementations return `Err` only when no response was obtained at all
/// (connection, DNS, timeout, unreadable body). Any status code, including
/// errors, is an `Ok` response.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// GET `url`, attaching `Authorization: token <token>` when a token is given
    async fn get(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> std::result::Result<HttpResponse, FetchError>;
}

/// Production [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with the configured user agent and request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> std::result::Result<HttpResponse, FetchError> {
        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {token}"));
        }

        let response = request.send().await.map_err(|e| {
            let error_msg = if e.is_timeout() {
                format!("Request timed out: {e}")
            } else if e.is_connect() {
                format!("Connection failed: {e}")
            } else {
                e.to_string()
            };
            tracing::warn!(url = %url, error = %error_msg, "request failed");
            FetchError::Transport(error_msg)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(url = %url, status, error = %e, "failed to read response body");
            FetchError::Transport(format!("Failed to read response body: {e}"))
        })?;

        tracing::debug!(url = %url, status, bytes = body.len(), "request completed");
        Ok(HttpResponse { status, body })
    }
}
