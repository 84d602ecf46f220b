//! Username intake: splitting free-form input into names and rejecting
//! names that break the account naming rule before any request is made.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Longest account name the host accepts
pub const MAX_USERNAME_LEN: usize = 39;

/// Alphanumeric start, then alphanumerics or hyphens, 1 to 39 characters total
static USERNAME_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{0,38}$"));

/// Check a username against the account naming rule
///
/// Rules:
/// - 1 to 39 characters
/// - ASCII letters, digits and hyphens only
/// - must not start with a hyphen
///
/// # Examples
///
/// ```
/// use exercise_validator::username::validate_username;
///
/// assert!(validate_username("octocat").is_ok());
/// assert!(validate_username("mona-lisa-42").is_ok());
/// assert!(validate_username("-leading").is_err());
/// assert!(validate_username("has space").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(Error::InvalidUsername("username cannot be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(Error::InvalidUsername(format!(
            "'{username}' is longer than {MAX_USERNAME_LEN} characters"
        )));
    }
    if username.starts_with('-') {
        return Err(Error::InvalidUsername(format!(
            "'{username}' must not start with a hyphen"
        )));
    }

    let pattern = USERNAME_PATTERN
        .as_ref()
        .map_err(|e| Error::Other(format!("username pattern failed to compile: {e}")))?;
    if !pattern.is_match(username) {
        return Err(Error::InvalidUsername(format!(
            "'{username}' may only contain letters, digits and hyphens"
        )));
    }
    Ok(())
}

/// Split free-form input into usernames
///
/// Names may be separated by newlines, commas or whitespace. Entries are
/// trimmed and empty ones dropped; order and duplicates are kept so each
/// entry later maps to exactly one result.
#[must_use]
pub fn parse_usernames(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Separate well-formed usernames from rejected ones
///
/// Returns `(accepted, rejected)`, both in input order. Each rejected entry
/// carries the reason it failed [`validate_username`].
pub fn partition_usernames(usernames: Vec<String>) -> (Vec<String>, Vec<(String, Error)>) {
    let mut accepted = Vec::with_capacity(usernames.len());
    let mut rejected = Vec::new();

    for name in usernames {
        let trimmed = name.trim();
        match validate_username(trimmed) {
            Ok(()) => accepted.push(trimmed.to_string()),
            Err(e) => {
                tracing::debug!(username = %name, error = %e, "rejecting username");
                rejected.push((name, e));
            }
        }
    }

    (accepted, rejected)
}
