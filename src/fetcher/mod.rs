//! Resolving one username to a completion status.
//!
//! The [`Fetcher`] builds the README URL for a user, retrieves it through a
//! [`Transport`] (falling back to the relay when the direct request fails with
//! an unexpected status) and searches the body for the completion marker.
//! Every failure is folded into the returned [`ValidationResult`]; nothing is
//! propagated to the caller.

mod strategy;
mod transport;

pub use transport::{HttpResponse, ReqwestTransport, Transport};

use std::sync::Arc;

use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::types::ValidationResult;

use strategy::FetchStrategy;

/// Resolves usernames against the exercise repository
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    config: Arc<Config>,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    /// Create a fetcher that talks HTTP through reqwest
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be created
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
        })
    }

    /// Create a fetcher over a caller-supplied transport
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transport,
            config: Arc::new(config),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// URL of the inspected file for `username`
    ///
    /// `<raw_base_url>/<username>/<repository>/<branch>/<file_path>`
    pub fn resource_url(&self, username: &str) -> String {
        let source = &self.config.source;
        format!(
            "{}/{}/{}/{}/{}",
            source.raw_base_url.trim_end_matches('/'),
            urlencoding::encode(username),
            source.repository,
            source.branch,
            source.file_path.trim_start_matches('/')
        )
    }

    /// Relay URL that wraps `target`
    pub fn proxy_url(&self, target: &str) -> String {
        strategy::proxy_url(&self.config.proxy.base_url, target)
    }

    /// Determine whether `username` has completed the exercise
    ///
    /// The username is trimmed first; a blank name fails with "Invalid username"
    /// without any request being made. A blank token counts as no token.
    pub async fn resolve(&self, username: &str, token: Option<&str>) -> ValidationResult {
        let username = username.trim();
        if username.is_empty() {
            return ValidationResult::failed(username, &FetchError::InvalidUsername);
        }

        let url = self.resource_url(username);
        let strategy = FetchStrategy::new(self.transport.as_ref(), &self.config.proxy);

        match strategy.fetch(&url, normalize_token(token)).await {
            Ok(body) if contains_marker(&body, &self.config.completion_marker) => {
                tracing::debug!(username = %username, "completion marker found");
                ValidationResult::completed(username)
            }
            Ok(_) => {
                tracing::debug!(username = %username, "completion marker absent");
                ValidationResult::not_completed(username)
            }
            Err(error) => {
                tracing::warn!(username = %username, error = %error, "validation failed");
                ValidationResult::failed(username, &error)
            }
        }
    }
}

/// Case-sensitive substring search for the completion marker
#[must_use]
pub fn contains_marker(body: &str, marker: &str) -> bool {
    body.contains(marker)
}

/// Treat a blank token as absent; any other token is passed through verbatim
pub(crate) fn normalize_token(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !t.trim().is_empty())
}
