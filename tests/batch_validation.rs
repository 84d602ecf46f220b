//! End-to-end validation runs against a mock raw-file host and relay
//!
//! Every request goes through the real reqwest transport to a local
//! `wiremock` server, so these tests cover URL construction, header
//! handling, status classification, proxy fallback and batch pacing together.

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use exercise_validator::{
    Event, Progress, ValidationResult, ValidationStatus, ValidationSummary, Validator,
    parse_usernames, partition_usernames,
};
use wiremock::MockServer;

#[tokio::test]
async fn test_mixed_outcomes_in_input_order() {
    let mock_server = MockServer::start().await;
    mount_readme(&mock_server, "finisher", 200, COMPLETED_README).await;
    mount_readme(&mock_server, "starter", 200, IN_PROGRESS_README).await;
    mount_readme(&mock_server, "alice", 403, "").await;
    mount_readme(&mock_server, "ghost", 404, "").await;
    mount_readme(&mock_server, "flaky", 500, "").await;
    mount_relay(&mock_server, "flaky", &format!("...{MARKER}...")).await;
    mount_readme(&mock_server, "broken", 502, "").await;

    let validator = Validator::new(mock_config(&mock_server)).unwrap();
    let names: Vec<String> = ["finisher", "starter", "alice", "ghost", "flaky", "broken"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let results = validator.validate_all(&names, Some("ghp_token"), None).await;

    assert_eq!(
        results,
        vec![
            ValidationResult::completed("finisher"),
            ValidationResult::not_completed("starter"),
            ValidationResult {
                username: "alice".into(),
                status: ValidationStatus::Error,
                details: Some("API rate limit exceeded".into()),
            },
            ValidationResult {
                username: "ghost".into(),
                status: ValidationStatus::Error,
                details: Some("Repository or README not found".into()),
            },
            ValidationResult::completed("flaky"),
            ValidationResult {
                username: "broken".into(),
                status: ValidationStatus::Error,
                // No relay mock mounted, so the relay answers 404
                details: Some("HTTP error: 502 Bad Gateway".into()),
            },
        ]
    );

    assert_eq!(
        ValidationSummary::from_results(&results),
        ValidationSummary {
            total: 6,
            completed: 2,
            not_completed: 1,
            errors: 3,
        }
    );
}

#[tokio::test]
async fn test_anonymous_run_batches_of_five() {
    let mock_server = MockServer::start().await;
    let names: Vec<String> = (0..23).map(|i| format!("student-{i}")).collect();
    for name in &names {
        mount_readme(&mock_server, name, 200, COMPLETED_README).await;
    }

    let validator = Validator::new(mock_config(&mock_server)).unwrap();
    let mut seen = Vec::new();
    let mut record = |p: Progress| seen.push(p.completed);

    let results = validator.validate_all(&names, None, Some(&mut record)).await;

    assert_eq!(seen, vec![5, 10, 15, 20, 23]);
    assert_eq!(results.len(), 23);
    assert!(results.iter().all(ValidationResult::is_completed));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 23);
    assert!(
        requests
            .iter()
            .all(|r| !r.headers.contains_key("authorization"))
    );
}

#[tokio::test]
async fn test_authenticated_run_batches_of_ten() {
    let mock_server = MockServer::start().await;
    let names: Vec<String> = (0..23).map(|i| format!("student-{i}")).collect();
    for name in &names {
        mount_readme(&mock_server, name, 200, IN_PROGRESS_README).await;
    }

    let validator = Validator::new(mock_config(&mock_server)).unwrap();
    let mut events = validator.subscribe();
    let mut seen = Vec::new();
    let mut record = |p: Progress| seen.push((p.completed, p.total));

    let results = validator
        .validate_all(&names, Some("ghp_token"), Some(&mut record))
        .await;

    assert_eq!(seen, vec![(10, 23), (20, 23), (23, 23)]);
    assert!(
        results
            .iter()
            .all(|r| r.status == ValidationStatus::NotCompleted)
    );

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| {
        r.headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("token ghp_token")
    }));

    let mut batch_sizes = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let Event::BatchStarted { size, .. } = event {
            batch_sizes.push(size);
        }
    }
    assert_eq!(batch_sizes, vec![10, 10, 3]);
}

#[tokio::test]
async fn test_free_form_input_pipeline() {
    let mock_server = MockServer::start().await;
    mount_readme(&mock_server, "octocat", 200, COMPLETED_README).await;
    mount_readme(&mock_server, "mona", 200, IN_PROGRESS_README).await;

    let input = "octocat, -not-valid\n  mona  \n\nbad_name";
    let (accepted, rejected) = partition_usernames(parse_usernames(input));
    assert_eq!(accepted, vec!["octocat", "mona"]);
    assert_eq!(rejected.len(), 2);

    let validator = Validator::new(mock_config(&mock_server)).unwrap();
    let results = validator.validate_all(&accepted, None, None).await;

    assert_eq!(results[0], ValidationResult::completed("octocat"));
    assert_eq!(results[1], ValidationResult::not_completed("mona"));
}

#[tokio::test]
async fn test_unreachable_host_degrades_to_errors() {
    let mut config = exercise_validator::Config::default();
    // Nothing listens on port 1
    config.source.raw_base_url = "http://127.0.0.1:1".to_string();
    config.proxy.enabled = false;

    let validator = Validator::new(config).unwrap();
    let names = vec!["octocat".to_string(), "mona".to_string()];

    let results = validator.validate_all(&names, None, None).await;

    assert_eq!(results.len(), 2);
    for (name, result) in names.iter().zip(&results) {
        assert_eq!(&result.username, name);
        assert!(result.is_error());
        assert!(result.details.as_deref().is_some_and(|d| !d.is_empty()));
    }
}
