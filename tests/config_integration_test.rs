//! Configuration loading integration tests

use secrecy::ExposeSecret;
use sonarex::config::{load_config, ExportMode};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_full_config_with_defaults() {
    let file = write_config(
        r#"
[application]
log_level = "debug"

[sonarqube]
base_url = "https://sonar.example.com"
token = "squ_abc123"
timeout_seconds = 60

[export]
project_keys = ["org:proj-a", "org:proj-b"]
start_date = "2024-06-01"
end_date = "2025-06-01"
mode = "incremental"
window_days = 14
chunk_size = 1000
output_dir = "./export"

[filters]
severities = ["BLOCKER", "CRITICAL"]
types = ["BUG"]

[state]
state_dir = "./state"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.sonarqube.base_url, "https://sonar.example.com");
    assert_eq!(config.sonarqube.token.expose_secret().as_ref(), "squ_abc123");
    assert_eq!(config.sonarqube.timeout_seconds, 60);
    // defaults
    assert_eq!(config.sonarqube.page_size, 500);
    assert_eq!(config.sonarqube.retry.max_attempts, 3);
    assert_eq!(config.sonarqube.retry.initial_delay_ms, 1000);

    assert_eq!(config.export.project_keys.len(), 2);
    assert_eq!(config.export.mode, ExportMode::Incremental);
    assert_eq!(config.export.window_days, 14);
    assert_eq!(config.export.chunk_size, 1000);
    assert!(config.export.overwrite_existing);

    assert_eq!(config.filters.severities, vec!["BLOCKER", "CRITICAL"]);
    assert!(config.filters.statuses.is_empty());
    assert_eq!(config.state.state_dir, "./state");
}

#[test]
fn substitutes_token_from_environment() {
    std::env::set_var("SONAREX_IT_TOKEN", "squ_from_env");

    let file = write_config(
        r#"
[sonarqube]
base_url = "https://sonar.example.com"
token = "${SONAREX_IT_TOKEN}"

[export]
project_keys = ["proj"]
start_date = "2025-01-01"
end_date = "2025-02-01"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(
        config.sonarqube.token.expose_secret().as_ref(),
        "squ_from_env"
    );

    std::env::remove_var("SONAREX_IT_TOKEN");
}

#[test]
fn missing_substitution_variable_is_an_error() {
    std::env::remove_var("SONAREX_IT_MISSING_TOKEN");

    let file = write_config(
        r#"
[sonarqube]
base_url = "https://sonar.example.com"
token = "${SONAREX_IT_MISSING_TOKEN}"

[export]
project_keys = ["proj"]
start_date = "2025-01-01"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("SONAREX_IT_MISSING_TOKEN"));
}

#[test]
fn rejects_inverted_or_malformed_dates_and_bad_filters() {
    let file = write_config(
        r#"
[sonarqube]
base_url = "https://sonar.example.com"
token = "squ_abc"

[export]
project_keys = ["proj"]
start_date = "01-01-2025"
"#,
    );
    assert!(load_config(file.path()).is_err());

    let file = write_config(
        r#"
[sonarqube]
base_url = "https://sonar.example.com"
token = "squ_abc"

[export]
project_keys = ["proj"]
start_date = "2025-01-01"

[filters]
types = ["FEATURE_REQUEST"]
"#,
    );
    assert!(load_config(file.path()).is_err());
}

#[test]
fn missing_required_sections_fail_parse() {
    let file = write_config(
        r#"
[application]
log_level = "info"
"#,
    );
    assert!(load_config(file.path()).is_err());
}
