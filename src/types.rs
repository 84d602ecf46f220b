//! Core types for exercise-validator

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::summary::ValidationSummary;

/// Completion status of one username
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Completion marker found in the exercise README
    Completed,
    /// README fetched, marker absent
    NotCompleted,
    /// Status could not be determined
    Error,
}

impl ValidationStatus {
    /// Wire name of the status ("completed", "not_completed", "error")
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Completed => "completed",
            ValidationStatus::NotCompleted => "not_completed",
            ValidationStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking one username
///
/// Exactly one is produced per input username. Failures are data: an
/// unreachable repository is an `Error` status with the cause in `details`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Trimmed username
    pub username: String,
    /// Classified status
    pub status: ValidationStatus,
    /// Success reason or error cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ValidationResult {
    /// Marker present
    pub fn completed(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            status: ValidationStatus::Completed,
            details: Some("Exercise completed successfully".to_string()),
        }
    }

    /// Marker absent
    pub fn not_completed(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            status: ValidationStatus::NotCompleted,
            details: Some("Completion phrase not found".to_string()),
        }
    }

    /// Failure folded into a result; details carry the error's text
    pub fn failed(username: impl Into<String>, error: &FetchError) -> Self {
        Self {
            username: username.into(),
            status: ValidationStatus::Error,
            details: Some(error.to_string()),
        }
    }

    /// Returns true if the status is `Completed`
    pub fn is_completed(&self) -> bool {
        self.status == ValidationStatus::Completed
    }

    /// Returns true if the status is `Error`
    pub fn is_error(&self) -> bool {
        self.status == ValidationStatus::Error
    }
}

/// Snapshot of how far a run has progressed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Usernames with a result so far
    pub completed: usize,
    /// Usernames in the run
    pub total: usize,
}

impl Progress {
    /// Completion percentage (100.0 for an empty run)
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            100.0
        } else {
            self.completed as f32 / self.total as f32 * 100.0
        }
    }
}

/// Event emitted during a validation run
///
/// Delivered through [`Validator::subscribe`](crate::orchestrator::Validator::subscribe).
/// Subscribers that lag or disconnect never affect the run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A batch is about to be fetched
    BatchStarted {
        /// Zero-based batch index
        index: usize,
        /// Number of batches in the run
        total_batches: usize,
        /// Usernames in this batch
        size: usize,
    },

    /// One username was resolved
    Checked {
        /// The result for that username
        result: ValidationResult,
    },

    /// A batch finished and its results were appended
    BatchCompleted {
        /// Zero-based batch index
        index: usize,
        /// Progress after this batch
        progress: Progress,
    },

    /// All batches processed
    Finished {
        /// Aggregated counts
        summary: ValidationSummary,
    },

    /// Run stopped early by its cancellation token
    Cancelled {
        /// Progress at the moment of cancellation
        progress: Progress,
    },
}
