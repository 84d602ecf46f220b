//! # exercise-validator
//!
//! Checks, for a list of GitHub usernames, whether each user has completed a
//! learning exercise. For every user the exercise README is fetched from the
//! user's copy of the exercise repository and searched for a fixed
//! completion marker.
//!
//! ## Design Philosophy
//!
//! exercise-validator is designed to be:
//! - **Partial-failure tolerant** - one unreachable user is one `error` result, never a failed run
//! - **Rate-limit aware** - usernames are checked in small concurrent batches with a pause between them
//! - **Library-first** - no UI; usernames, token and progress sink are plain parameters
//! - **Testable** - HTTP goes through the [`Transport`](fetcher::Transport) trait
//!
//! ## Quick Start
//!
//! ```no_run
//! use exercise_validator::{Config, Progress, Validator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let validator = Validator::new(Config::default())?;
//!     let usernames = vec!["octocat".to_string(), "mona".to_string()];
//!
//!     let mut on_progress = |p: Progress| println!("{}/{}", p.completed, p.total);
//!     let results = validator
//!         .validate_all(&usernames, std::env::var("GITHUB_TOKEN").ok().as_deref(), Some(&mut on_progress))
//!         .await;
//!
//!     for result in results {
//!         println!("{}: {}", result.username, result.status);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Single-username resolution
pub mod fetcher;
/// Batched validation runs
pub mod orchestrator;
/// Aggregated counts and rate-limit warning
pub mod summary;
/// Core types and events
pub mod types;
/// Username validation and list parsing
pub mod username;

// Re-export commonly used types
pub use config::{BatchPolicy, BatchingConfig, Config, ProxyConfig, SourceConfig};
pub use error::{Error, FetchError, Result};
pub use fetcher::{Fetcher, HttpResponse, ReqwestTransport, Transport};
pub use orchestrator::{BatchPlan, ProgressCallback, Validator};
pub use summary::{ValidationSummary, rate_limit_warning};
pub use types::{Event, Progress, ValidationResult, ValidationStatus};
pub use username::{parse_usernames, partition_usernames, validate_username};
