//! Aggregated counts over a finished run, and the up-front warning shown
//! before large unauthenticated runs.

use serde::{Deserialize, Serialize};

use crate::types::{ValidationResult, ValidationStatus};

/// Counts per status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Results counted
    pub total: usize,
    /// `completed` results
    pub completed: usize,
    /// `not_completed` results
    pub not_completed: usize,
    /// `error` results
    pub errors: usize,
}

impl ValidationSummary {
    /// Count the statuses in `results`
    pub fn from_results(results: &[ValidationResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.total += 1;
            match result.status {
                ValidationStatus::Completed => summary.completed += 1,
                ValidationStatus::NotCompleted => summary.not_completed += 1,
                ValidationStatus::Error => summary.errors += 1,
            }
            summary
        })
    }
}

impl std::fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} checked: {} completed, {} not completed, {} errors",
            self.total, self.completed, self.not_completed, self.errors
        )
    }
}

/// Warning text for a run likely to hit the unauthenticated rate limit
///
/// Returns `Some` only when no token is supplied and `count` exceeds `threshold`.
#[must_use]
pub fn rate_limit_warning(count: usize, has_token: bool, threshold: usize) -> Option<String> {
    if has_token || count <= threshold {
        return None;
    }
    Some(format!(
        "Checking {count} usernames without an access token; \
         unauthenticated requests are rate limited and some checks may fail. \
         Supply a token to raise the limit."
    ))
}
