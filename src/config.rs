//! Configuration types for exercise-validator

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Where the exercise README lives on the raw-file host
///
/// The resource for a user is `<raw_base_url>/<username>/<repository>/<branch>/<file_path>`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// Raw-file host (default: "https://raw.githubusercontent.com")
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,

    /// Exercise repository name under each user's namespace
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Branch holding the README (default: "main")
    #[serde(default = "default_branch")]
    pub branch: String,

    /// File inspected for the completion marker (default: "README.md")
    #[serde(default = "default_file_path")]
    pub file_path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            raw_base_url: default_raw_base_url(),
            repository: default_repository(),
            branch: default_branch(),
            file_path: default_file_path(),
        }
    }
}

/// Cross-origin relay used when the direct fetch fails with an unexpected status
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Whether the fallback attempt is made at all (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Relay base URL; requests go to `<base_url>/get?url=<encoded target>`
    #[serde(default = "default_proxy_base_url")]
    pub base_url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_proxy_base_url(),
        }
    }
}

/// Size of one batch and the pause that follows it
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Usernames fetched concurrently per batch
    pub batch_size: usize,

    /// Pause between consecutive batches (serialized as milliseconds)
    #[serde(with = "duration_ms_serde")]
    pub delay: Duration,
}

/// Admission control against the remote host's rate limit
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchingConfig {
    /// Policy when an access token is supplied (default: 10 per batch, 100 ms)
    #[serde(default = "default_authenticated_policy")]
    pub authenticated: BatchPolicy,

    /// Policy for unauthenticated runs (default: 5 per batch, 500 ms)
    #[serde(default = "default_anonymous_policy")]
    pub anonymous: BatchPolicy,

    /// Unauthenticated runs larger than this are warned about (default: 10)
    #[serde(default = "default_anonymous_warning_threshold")]
    pub anonymous_warning_threshold: usize,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            authenticated: default_authenticated_policy(),
            anonymous: default_anonymous_policy(),
            anonymous_warning_threshold: default_anonymous_warning_threshold(),
        }
    }
}

/// Main configuration for the validator
///
/// Every field has a default, so `Config::default()` checks the standard
/// exercise against the public raw-file host.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Location of the inspected file
    #[serde(default)]
    pub source: SourceConfig,

    /// Fallback relay settings
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Batch sizing and pacing
    #[serde(default)]
    pub batching: BatchingConfig,

    /// Exact, case-sensitive text marking the exercise as completed
    #[serde(default = "default_completion_marker")]
    pub completion_marker: String,

    /// Per-request timeout in seconds (None = client default)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            proxy: ProxyConfig::default(),
            batching: BatchingConfig::default(),
            completion_marker: default_completion_marker(),
            request_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Parse a JSON document and validate the result
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Check that the configuration can drive a run
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        validate_base_url("source.raw_base_url", &self.source.raw_base_url)?;
        if self.proxy.enabled {
            validate_base_url("proxy.base_url", &self.proxy.base_url)?;
        }

        for (key, value) in [
            ("source.repository", &self.source.repository),
            ("source.branch", &self.source.branch),
            ("source.file_path", &self.source.file_path),
            ("completion_marker", &self.completion_marker),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config(key, format!("{key} must not be empty")));
            }
        }

        for (key, policy) in [
            ("batching.authenticated.batch_size", &self.batching.authenticated),
            ("batching.anonymous.batch_size", &self.batching.anonymous),
        ] {
            if policy.batch_size == 0 {
                return Err(Error::config(key, "batch size must be at least 1"));
            }
        }

        Ok(())
    }
}

fn validate_base_url(key: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| Error::config(key, format!("invalid URL '{value}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::config(
            key,
            format!("unsupported URL scheme '{other}' (expected http or https)"),
        )),
    }
}

// Default value functions
fn default_raw_base_url() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_repository() -> String {
    "skills-introduction-to-github".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_file_path() -> String {
    "README.md".to_string()
}

fn default_proxy_base_url() -> String {
    "https://api.allorigins.win".to_string()
}

fn default_true() -> bool {
    true
}

fn default_authenticated_policy() -> BatchPolicy {
    BatchPolicy {
        batch_size: 10,
        delay: Duration::from_millis(100),
    }
}

fn default_anonymous_policy() -> BatchPolicy {
    BatchPolicy {
        batch_size: 5,
        delay: Duration::from_millis(500),
    }
}

fn default_anonymous_warning_threshold() -> usize {
    10
}

fn default_completion_marker() -> String {
    "You've successfully completed this exercise!".to_string()
}

fn default_user_agent() -> String {
    concat!("exercise-validator/", env!("CARGO_PKG_VERSION")).to_string()
}

// Millisecond Duration serialization helper
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

// Optional Duration serialization helper (whole seconds)
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_rate_limit_policy() {
        let config = Config::default();
        assert_eq!(config.batching.authenticated.batch_size, 10);
        assert_eq!(
            config.batching.authenticated.delay,
            Duration::from_millis(100)
        );
        assert_eq!(config.batching.anonymous.batch_size, 5);
        assert_eq!(config.batching.anonymous.delay, Duration::from_millis(500));
        assert_eq!(config.batching.anonymous_warning_threshold, 10);
        assert_eq!(
            config.completion_marker,
            "You've successfully completed this exercise!"
        );
        assert!(config.proxy.enabled);
        assert!(config.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_yields_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let json = r#"{
            "source": { "repository": "my-exercise" },
            "batching": { "anonymous": { "batch_size": 2, "delay": 50 } },
            "request_timeout": 15
        }"#;
        let config = Config::from_json_str(json).unwrap();

        assert_eq!(config.source.repository, "my-exercise");
        assert_eq!(config.source.branch, "main");
        assert_eq!(config.batching.anonymous.batch_size, 2);
        assert_eq!(config.batching.anonymous.delay, Duration::from_millis(50));
        assert_eq!(config.batching.authenticated.batch_size, 10);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = Config::default();
        config.batching.authenticated.batch_size = 0;

        match config.validate() {
            Err(Error::Config { key, .. }) => {
                assert_eq!(key.as_deref(), Some("batching.authenticated.batch_size"));
            }
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_urls_rejected() {
        let mut config = Config::default();
        config.source.raw_base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(Error::Config { .. })));

        let mut config = Config::default();
        config.proxy.base_url = "ftp://relay.example.com".into();
        assert!(matches!(config.validate(), Err(Error::Config { .. })));

        // Disabled proxy is not checked
        config.proxy.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_marker_rejected() {
        let mut config = Config::default();
        config.completion_marker = "   ".into();
        match config.validate() {
            Err(Error::Config { key, .. }) => {
                assert_eq!(key.as_deref(), Some("completion_marker"));
            }
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_serialization_roundtrip_keeps_millis() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["batching"]["anonymous"]["delay"], 500);
        assert_eq!(json["batching"]["authenticated"]["delay"], 100);
        assert!(json["request_timeout"].is_null());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validator.json");
        std::fs::write(&path, r#"{ "proxy": { "enabled": false } }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.proxy.enabled);

        let missing = Config::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let result = Config::from_json_str("{ not json");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
