// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as well-formed URLs and non-zero intervals.

use crate::diagnostic::ConfigError;
use crate::model::UniboxConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &UniboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_http_url("store.base_url", &config.store.base_url, &mut errors);

    if config.store.connect_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "store.connect_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.store.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "store.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.queue.base_delay_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "queue.base_delay_ms must be at least 1".to_string(),
        });
    }

    if config.queue.poll_interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "queue.poll_interval_ms must be at least 1".to_string(),
        });
    }

    // 2^retry_count delay computation; anything past this is operator error.
    if config.queue.max_retries > 16 {
        errors.push(ConfigError::Validation {
            message: format!(
                "queue.max_retries must be at most 16, got {}",
                config.queue.max_retries
            ),
        });
    }

    if config.presence.typing_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "presence.typing_ttl_secs must be at least 1".to_string(),
        });
    }

    for (section, endpoint) in [
        ("telegram", &config.telegram),
        ("messenger", &config.messenger),
        ("twitter", &config.twitter),
        ("sms", &config.sms),
    ] {
        if let Some(url) = &endpoint.webhook_url {
            validate_http_url(&format!("{section}.webhook_url"), url, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Push a validation error unless `value` looks like an http(s) URL.
fn validate_http_url(key: &str, value: &str, errors: &mut Vec<ConfigError>) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
    } else if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("{key} must be an http(s) URL, got `{trimmed}`"),
        });
    }
}
