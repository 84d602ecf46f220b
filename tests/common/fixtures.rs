//! README fixtures and mock-server helpers

use exercise_validator::Config;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Exact completion marker
pub const MARKER: &str = "You've successfully completed this exercise!";

/// README of a user who finished the exercise
pub const COMPLETED_README: &str = "# Introduction to GitHub\n\n\
    <header>\n\n## Finish\n\nCongratulations friend, You've successfully completed this exercise!\n\
    Here's a recap of your accomplishments.\n</header>\n";

/// README of a user who has not finished yet
pub const IN_PROGRESS_README: &str = "# Introduction to GitHub\n\n\
    ## Step 2: Commit a file\n\n_You created a branch! :tada:_\n";

/// Path of the README for `username` under the default repository
pub fn readme_path(username: &str) -> String {
    format!("/{username}/skills-introduction-to-github/main/README.md")
}

/// Config pointing both the raw host and the relay at `server`, with fast pacing
pub fn mock_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.source.raw_base_url = server.uri();
    config.proxy.base_url = server.uri();
    config.batching.authenticated.delay = Duration::from_millis(5);
    config.batching.anonymous.delay = Duration::from_millis(5);
    config
}

/// Serve `body` with `status` for `username`'s README
pub async fn mount_readme(server: &MockServer, username: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(readme_path(username)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve a relay envelope wrapping `contents` for `username`'s README
pub async fn mount_relay(server: &MockServer, username: &str, contents: &str) {
    let target = format!("{}{}", server.uri(), readme_path(username));
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("url", target.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "contents": contents,
            "status": { "url": target, "http_code": 200 },
        })))
        .mount(server)
        .await;
}
