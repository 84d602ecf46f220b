//! Batch orchestration: partitioning usernames into rate-limit-sized
//! batches, fetching each batch concurrently, reporting progress and
//! pausing between batches.
//!
//! A run never fails as a whole. Every username yields exactly one
//! [`ValidationResult`], in input order, whatever happens to its request.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::{BatchingConfig, Config};
use crate::error::{FetchError, Result};
use crate::fetcher::{Fetcher, Transport, normalize_token};
use crate::summary::{ValidationSummary, rate_limit_warning};
use crate::types::{Event, Progress, ValidationResult};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Progress sink invoked synchronously after each batch
pub type ProgressCallback<'a> = &'a mut (dyn FnMut(Progress) + Send);

/// Batch size and inter-batch pause chosen for a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    /// Usernames fetched concurrently per batch
    pub batch_size: usize,
    /// Pause after every batch except the last
    pub delay: Duration,
}

impl BatchPlan {
    /// Pick the authenticated or anonymous policy
    pub fn for_token(batching: &BatchingConfig, has_token: bool) -> Self {
        let policy = if has_token {
            batching.authenticated
        } else {
            batching.anonymous
        };
        Self {
            batch_size: policy.batch_size.max(1),
            delay: policy.delay,
        }
    }

    /// Number of batches needed for `total` usernames
    pub fn batch_count(&self, total: usize) -> usize {
        total.div_ceil(self.batch_size)
    }

    /// Sizes of the consecutive batches for `total` usernames
    ///
    /// ```
    /// use exercise_validator::config::BatchingConfig;
    /// use exercise_validator::orchestrator::BatchPlan;
    ///
    /// let batching = BatchingConfig::default();
    /// assert_eq!(BatchPlan::for_token(&batching, true).batch_sizes(23), vec![10, 10, 3]);
    /// assert_eq!(BatchPlan::for_token(&batching, false).batch_sizes(23), vec![5, 5, 5, 5, 3]);
    /// ```
    pub fn batch_sizes(&self, total: usize) -> Vec<usize> {
        (0..self.batch_count(total))
            .map(|i| (total - i * self.batch_size).min(self.batch_size))
            .collect()
    }
}

/// Drives the [`Fetcher`] across a list of usernames
#[derive(Clone, Debug)]
pub struct Validator {
    fetcher: Fetcher,
    event_tx: broadcast::Sender<Event>,
}

impl Validator {
    /// Create a validator that talks HTTP through reqwest
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be created
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::from_fetcher(Fetcher::new(config)?))
    }

    /// Create a validator over a caller-supplied transport
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn with_transport(
        config: Config,
        transport: std::sync::Arc<dyn Transport>,
    ) -> Result<Self> {
        Ok(Self::from_fetcher(Fetcher::with_transport(
            config, transport,
        )?))
    }

    /// Wrap an existing fetcher
    pub fn from_fetcher(fetcher: Fetcher) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { fetcher, event_tx }
    }

    /// The fetcher used for each username
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Subscribe to run events
    ///
    /// Receivers only see events sent after they subscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Check every username and return one result per username, in input order
    ///
    /// Batches run one after another; the fetches inside a batch run
    /// concurrently. `on_progress` is called after each batch with the
    /// number of results so far and the total.
    pub async fn validate_all(
        &self,
        usernames: &[String],
        token: Option<&str>,
        on_progress: Option<ProgressCallback<'_>>,
    ) -> Vec<ValidationResult> {
        self.validate_all_with_cancel(usernames, token, on_progress, &CancellationToken::new())
            .await
    }

    /// Like [`validate_all`](Self::validate_all), stopping early when `cancel` fires
    ///
    /// Cancellation takes effect between batches: the batch in flight
    /// finishes, no further batch starts, and each username not yet checked
    /// gets an error result with details "Validation cancelled".
    pub async fn validate_all_with_cancel(
        &self,
        usernames: &[String],
        token: Option<&str>,
        mut on_progress: Option<ProgressCallback<'_>>,
        cancel: &CancellationToken,
    ) -> Vec<ValidationResult> {
        let token = normalize_token(token);
        let total = usernames.len();
        let batching = &self.fetcher.config().batching;
        let plan = BatchPlan::for_token(batching, token.is_some());
        let total_batches = plan.batch_count(total);

        if let Some(warning) =
            rate_limit_warning(total, token.is_some(), batching.anonymous_warning_threshold)
        {
            tracing::warn!(total, "{}", warning);
        }
        tracing::info!(
            total,
            batch_size = plan.batch_size,
            total_batches,
            authenticated = token.is_some(),
            "starting validation run"
        );

        let mut results = Vec::with_capacity(total);

        for (index, batch) in usernames.chunks(plan.batch_size).enumerate() {
            if cancel.is_cancelled() {
                break;
            }

            self.event_tx
                .send(Event::BatchStarted {
                    index,
                    total_batches,
                    size: batch.len(),
                })
                .ok();

            let batch_results = self.run_batch(batch, token).await;
            for result in &batch_results {
                self.event_tx
                    .send(Event::Checked {
                        result: result.clone(),
                    })
                    .ok();
            }
            results.extend(batch_results);

            let progress = Progress {
                completed: results.len(),
                total,
            };
            if let Some(callback) = on_progress.as_mut() {
                callback(progress);
            }
            self.event_tx
                .send(Event::BatchCompleted { index, progress })
                .ok();
            tracing::debug!(
                batch = index + 1,
                total_batches,
                completed = progress.completed,
                total,
                "batch completed"
            );

            if index + 1 < total_batches {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(plan.delay) => {}
                }
            }
        }

        if results.len() < total {
            let progress = Progress {
                completed: results.len(),
                total,
            };
            tracing::warn!(
                completed = progress.completed,
                total,
                "validation run cancelled"
            );
            self.event_tx.send(Event::Cancelled { progress }).ok();

            results.extend(
                usernames[results.len()..]
                    .iter()
                    .map(|name| ValidationResult::failed(name.trim(), &FetchError::Cancelled)),
            );
            return results;
        }

        let summary = ValidationSummary::from_results(&results);
        tracing::info!(
            total = summary.total,
            completed = summary.completed,
            not_completed = summary.not_completed,
            errors = summary.errors,
            "validation run finished"
        );
        self.event_tx.send(Event::Finished { summary }).ok();

        results
    }

    /// Resolve one batch concurrently, returning results in batch order
    async fn run_batch(&self, batch: &[String], token: Option<&str>) -> Vec<ValidationResult> {
        let fetches = batch.iter().enumerate().map(|(offset, username)| async move {
            (offset, self.fetcher.resolve(username, token).await)
        });

        let mut settled = futures::future::join_all(fetches).await;
        // Re-establish submission order explicitly
        settled.sort_by_key(|(offset, _)| *offset);
        settled.into_iter().map(|(_, result)| result).collect()
    }
}
