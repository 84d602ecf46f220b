//! Check a list of usernames from the command line
//!
//! This example demonstrates the core functionality of exercise-validator:
//! - Parsing and validating free-form username input
//! - Warning about large unauthenticated runs
//! - Running a batched validation with a progress callback
//! - Subscribing to run events
//! - Summarizing the results
//!
//! Usernames come from the arguments, or from stdin when no arguments are
//! given. Set `GITHUB_TOKEN` to use the authenticated batch policy, and
//! `VALIDATOR_CONFIG` to load a JSON configuration file.
//!
//! ```bash
//! GITHUB_TOKEN=ghp_... cargo run --example check_usernames -- octocat mona
//! ```

use std::io::Read;

use exercise_validator::{
    Config, Event, Progress, ValidationStatus, ValidationSummary, Validator, parse_usernames,
    partition_usernames, rate_limit_warning,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let config = match std::env::var("VALIDATOR_CONFIG") {
        Ok(path) => Config::load(path)?,
        Err(_) => Config::default(),
    };
    let token = std::env::var("GITHUB_TOKEN").ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = if args.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.join("\n")
    };

    let (usernames, rejected) = partition_usernames(parse_usernames(&input));
    for (name, error) in &rejected {
        eprintln!("✗ Skipping '{}': {}", name, error);
    }
    if usernames.is_empty() {
        eprintln!("No valid usernames to check");
        return Ok(());
    }

    let has_token = token.as_deref().is_some_and(|t| !t.trim().is_empty());
    if let Some(warning) = rate_limit_warning(
        usernames.len(),
        has_token,
        config.batching.anonymous_warning_threshold,
    ) {
        eprintln!("⚠ {}", warning);
    }

    let validator = Validator::new(config)?;

    // Subscribe to events
    let mut events = validator.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let Event::BatchStarted {
                index,
                total_batches,
                size,
            } = event
            {
                println!("→ Batch {}/{} ({} users)", index + 1, total_batches, size);
            }
        }
    });

    let mut on_progress = |p: Progress| {
        println!("  {}/{} checked ({:.0}%)", p.completed, p.total, p.percent());
    };
    let results = validator
        .validate_all(&usernames, token.as_deref(), Some(&mut on_progress))
        .await;

    println!();
    for result in &results {
        let icon = match result.status {
            ValidationStatus::Completed => "✓",
            ValidationStatus::NotCompleted => "…",
            ValidationStatus::Error => "✗",
        };
        println!(
            "{} {:<39} {}",
            icon,
            result.username,
            result.details.as_deref().unwrap_or("")
        );
    }

    println!("\n{}", ValidationSummary::from_results(&results));
    Ok(())
}
