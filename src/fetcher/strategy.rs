//! Two-step fetch policy: one direct request, then at most one request
//! through the relay when the direct status is neither success nor a
//! recognized failure.

use serde::Deserialize;

use crate::config::ProxyConfig;
use crate::error::FetchError;

use super::transport::{HttpResponse, Transport};

/// Body of the inspected document, or why it could not be retrieved.
pub(crate) type FetchOutcome = std::result::Result<String, FetchError>;

/// What the direct response tells us to do next
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DirectVerdict {
    /// 2xx: inspect this body
    Body(String),
    /// Recognized failure; no fallback
    Failed(FetchError),
    /// Unexpected status; try the relay
    Fallback {
        /// Status of the direct attempt, reported if the relay fails too
        status: u16,
    },
}

/// JSON envelope returned by the relay's `/get` endpoint
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    contents: Option<String>,
}

/// Classify the direct response
pub(crate) fn classify_direct(response: HttpResponse) -> DirectVerdict {
    match response.status {
        _ if response.is_success() => DirectVerdict::Body(response.body),
        403 => DirectVerdict::Failed(FetchError::RateLimited),
        404 => DirectVerdict::Failed(FetchError::NotFound),
        status => DirectVerdict::Fallback { status },
    }
}

/// Classify the relay response, unwrapping `contents` from the envelope
///
/// A non-success relay status is reported with the status of the direct
/// attempt, since that is the request the caller asked for.
pub(crate) fn classify_fallback(response: HttpResponse, direct_status: u16) -> FetchOutcome {
    if !response.is_success() {
        tracing::warn!(
            direct_status,
            proxy_status = response.status,
            "proxy fallback failed"
        );
        return Err(FetchError::http_status(direct_status));
    }

    let envelope: ProxyEnvelope = serde_json::from_str(&response.body)
        .map_err(|e| FetchError::MalformedEnvelope(e.to_string()))?;
    envelope
        .contents
        .ok_or_else(|| FetchError::MalformedEnvelope("missing contents".to_string()))
}

/// Relay URL wrapping `target`: `<base_url>/get?url=<encoded target>`
pub(crate) fn proxy_url(base_url: &str, target: &str) -> String {
    format!(
        "{}/get?url={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(target)
    )
}

/// Direct-then-relay retrieval of one document
pub(crate) struct FetchStrategy<'a> {
    transport: &'a dyn Transport,
    proxy: &'a ProxyConfig,
}

impl<'a> FetchStrategy<'a> {
    pub(crate) fn new(transport: &'a dyn Transport, proxy: &'a ProxyConfig) -> Self {
        Self { transport, proxy }
    }

    /// Retrieve the document at `url`
    ///
    /// The token is sent only on the direct request; the relay is a third
    /// party and never sees it.
    pub(crate) async fn fetch(&self, url: &str, token: Option<&str>) -> FetchOutcome {
        let direct = self.transport.get(url, token).await?;

        let status = match classify_direct(direct) {
            DirectVerdict::Body(body) => return Ok(body),
            DirectVerdict::Failed(error) => {
                if error.is_rate_limit() {
                    tracing::warn!(url = %url, "rate limit hit on direct fetch");
                }
                return Err(error);
            }
            DirectVerdict::Fallback { status } => status,
        };

        if !self.proxy.enabled {
            tracing::debug!(url = %url, status, "unexpected status and proxy disabled");
            return Err(FetchError::http_status(status));
        }

        let relay_url = proxy_url(&self.proxy.base_url, url);
        tracing::warn!(url = %url, status, "direct fetch failed, retrying through proxy");
        let relayed = self.transport.get(&relay_url, None).await?;
        classify_fallback(relayed, status)
    }
}
