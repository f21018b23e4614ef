// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Unibox configuration system.

use unibox_config::diagnostic::{suggest_key, ConfigError};
use unibox_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_unibox_config() {
    let toml = r#"
[service]
log_level = "debug"

[store]
base_url = "http://store.internal:8787"
connect_timeout_secs = 5
request_timeout_secs = 15

[queue]
max_retries = 5
base_delay_ms = 500
poll_interval_ms = 250
error_backoff_secs = 2

[presence]
typing_ttl_secs = 20

[telegram]
webhook_url = "http://localhost:9001/relay"

[sms]
webhook_url = "http://localhost:9002/relay"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.store.base_url, "http://store.internal:8787");
    assert_eq!(config.store.connect_timeout_secs, 5);
    assert_eq!(config.queue.max_retries, 5);
    assert_eq!(config.queue.base_delay_ms, 500);
    assert_eq!(config.queue.poll_interval_ms, 250);
    assert_eq!(config.presence.typing_ttl_secs, 20);
    assert_eq!(
        config.telegram.webhook_url.as_deref(),
        Some("http://localhost:9001/relay")
    );
    assert_eq!(config.messenger.webhook_url, None);
}

/// Empty input yields the documented defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("defaults should deserialize");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.store.base_url, "http://127.0.0.1:8787");
    assert_eq!(config.queue.max_retries, 3);
    assert_eq!(config.queue.base_delay_ms, 1000);
    assert_eq!(config.queue.poll_interval_ms, 1000);
    assert_eq!(config.queue.error_backoff_secs, 5);
    assert_eq!(config.presence.typing_ttl_secs, 10);
}

/// Unknown field in [queue] section produces an error.
#[test]
fn unknown_field_in_queue_produces_error() {
    let toml = r#"
[queue]
max_retrise = 3
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("max_retrise"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// A typo close to a real key gets a suggestion.
#[test]
fn near_miss_key_is_suggested() {
    let suggestion = suggest_key("max_retrise", &["max_retries", "base_delay_ms"]);
    assert_eq!(suggestion.as_deref(), Some("max_retries"));
}

/// A key nothing like the valid set gets no suggestion.
#[test]
fn distant_key_gets_no_suggestion() {
    assert_eq!(suggest_key("zzzzzz", &["max_retries", "base_delay_ms"]), None);
}

/// Validation rejects a non-HTTP store URL and reports it as a single
/// collected error.
#[test]
fn validation_rejects_non_http_store_url() {
    let errors = load_and_validate_str(
        r#"
[store]
base_url = "redis://127.0.0.1:6379"
"#,
    )
    .expect_err("non-http URL should fail validation");

    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("store.base_url"))
    ));
}

/// Validation collects every failure instead of stopping at the first.
#[test]
fn validation_collects_all_errors() {
    let errors = load_and_validate_str(
        r#"
[store]
base_url = "not a url"
request_timeout_secs = 0

[queue]
poll_interval_ms = 0
"#,
    )
    .expect_err("multiple invalid fields should fail validation");

    assert!(errors.len() >= 3, "expected 3+ errors, got {}", errors.len());
}

/// Webhook URLs are validated when present.
#[test]
fn validation_rejects_bad_webhook_url() {
    let errors = load_and_validate_str(
        r#"
[telegram]
webhook_url = "ftp://relay.example"
"#,
    )
    .expect_err("non-http webhook should fail validation");
    assert_eq!(errors.len(), 1);
}
