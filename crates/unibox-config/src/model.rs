// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Unibox delivery core.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Unibox configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UniboxConfig {
    /// Service-wide settings (logging).
    #[serde(default)]
    pub service: ServiceConfig,

    /// Remote key-value store endpoint settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Delivery queue and retry settings.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Presence/typing cache settings.
    #[serde(default)]
    pub presence: PresenceConfig,

    /// Outbound webhook sender for Telegram replies.
    #[serde(default)]
    pub telegram: SenderEndpointConfig,

    /// Outbound webhook sender for Messenger replies.
    #[serde(default)]
    pub messenger: SenderEndpointConfig,

    /// Outbound webhook sender for Twitter DMs.
    #[serde(default)]
    pub twitter: SenderEndpointConfig,

    /// Outbound webhook sender for device SMS relay.
    #[serde(default)]
    pub sms: SenderEndpointConfig,
}

/// Service-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Remote store endpoint configuration.
///
/// The store is reached via a single HTTP command endpoint at
/// `<base_url>/redis`; there is no native client library.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URL of the remote store's HTTP command endpoint.
    #[serde(default = "default_store_base_url")]
    pub base_url: String,

    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Total per-request timeout in seconds (covers read and write).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_store_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_store_base_url() -> String {
    "http://127.0.0.1:8787".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

/// Delivery queue and retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Maximum retry attempts before a message is dead-lettered.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; doubled per retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Idle poll interval in milliseconds when a queue is empty.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Backoff in seconds after an unexpected processor error.
    #[serde(default = "default_error_backoff_secs")]
    pub error_backoff_secs: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            error_backoff_secs: default_error_backoff_secs(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_error_backoff_secs() -> u64 {
    5
}

/// Presence/typing cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PresenceConfig {
    /// TTL in seconds for typing indicator keys. Enforced by the store;
    /// a typing indicator with no refresh for this long reads as absent.
    #[serde(default = "default_typing_ttl")]
    pub typing_ttl_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            typing_ttl_secs: default_typing_ttl(),
        }
    }
}

fn default_typing_ttl() -> u64 {
    10
}

/// Per-platform outbound webhook sender configuration.
///
/// `None` disables the platform's processor in the daemon.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SenderEndpointConfig {
    /// URL the sender POSTs `{recipientId, content}` payloads to.
    #[serde(default)]
    pub webhook_url: Option<String>,
}
