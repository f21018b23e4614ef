// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the remote store's command endpoint.
//!
//! Provides [`HttpStore`] which handles request construction, timeouts,
//! and the absorb-into-sentinel failure contract of [`KvStore`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use unibox_config::model::StoreConfig;
use unibox_core::{KvStore, UniboxError};

/// Request body for the store's command endpoint.
#[derive(Debug, Serialize)]
struct CommandRequest<'a> {
    command: &'a str,
    args: Vec<&'a str>,
}

/// A failed round-trip to the store, kept distinct from "key not found".
///
/// This never crosses the [`KvStore`] surface -- the trait's contract is
/// sentinel values -- but keeping the distinction internal lets failures be
/// logged as what they are instead of being conflated with empty reads.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("store transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Client for the remote store's HTTP command protocol.
///
/// Every [`KvStore`] operation is one `POST <base-url>/redis` round-trip.
/// Commands mirror a conventional key-value/list/counter/pub-sub store:
/// SET, SETEX, GET, DEL, LPUSH, RPOP, INCR, KEYS, PUBLISH.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpStore {
    /// Creates a new store client from config.
    ///
    /// Applies the configured connect and per-request timeouts; the command
    /// endpoint is `<base_url>/redis`.
    pub fn new(config: &StoreConfig) -> Result<Self, UniboxError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| UniboxError::Store {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let endpoint = format!("{}/redis", config.base_url.trim_end_matches('/'));

        Ok(Self { client, endpoint })
    }

    /// Executes one store command.
    ///
    /// Returns `Ok(Some(body))` for a 200 with a non-empty body,
    /// `Ok(None)` for a 200 with an empty body or a 404 (key absent), and
    /// `Err` for transport failures and every other status.
    async fn command(&self, command: &str, args: Vec<&str>) -> Result<Option<String>, StoreError> {
        let request = CommandRequest { command, args };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(StoreError::Transport)?;

        let status = response.status();
        debug!(command, status = %status, "store command round-trip");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        let body = response.text().await.map_err(StoreError::Transport)?;
        if body.is_empty() {
            Ok(None)
        } else {
            Ok(Some(body))
        }
    }

    /// Absorbs a command failure into `false`, logging it.
    async fn command_ok(&self, command: &str, args: Vec<&str>) -> bool {
        match self.command(command, args).await {
            Ok(_) => true,
            Err(e) => {
                warn!(command, error = %e, "store command failed");
                false
            }
        }
    }
}

#[async_trait]
impl KvStore for HttpStore {
    async fn set(&self, key: &str, value: &str) -> bool {
        self.command_ok("SET", vec![key, value]).await
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> bool {
        let ttl = ttl_seconds.to_string();
        self.command_ok("SETEX", vec![key, &ttl, value]).await
    }

    async fn get(&self, key: &str) -> Option<String> {
        match self.command("GET", vec![key]).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "store GET failed, treating as absent");
                None
            }
        }
    }

    async fn delete(&self, key: &str) -> bool {
        self.command_ok("DEL", vec![key]).await
    }

    async fn list_push(&self, key: &str, value: &str) -> bool {
        self.command_ok("LPUSH", vec![key, value]).await
    }

    async fn list_pop(&self, key: &str) -> Option<String> {
        match self.command("RPOP", vec![key]).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "store RPOP failed, treating as empty");
                None
            }
        }
    }

    async fn increment(&self, key: &str) -> i64 {
        match self.command("INCR", vec![key]).await {
            Ok(Some(body)) => body.trim().parse().unwrap_or_else(|_| {
                warn!(key, body, "store INCR returned non-numeric body");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                warn!(key, error = %e, "store INCR failed");
                0
            }
        }
    }

    async fn scan_keys(&self, pattern: &str) -> Vec<String> {
        let body = match self.command("KEYS", vec![pattern]).await {
            Ok(Some(body)) => body,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(pattern, error = %e, "store KEYS failed, returning empty");
                return Vec::new();
            }
        };

        // The endpoint returns multi-valued results as a JSON string array;
        // tolerate a newline-separated body from older store builds.
        if let Ok(keys) = serde_json::from_str::<Vec<String>>(&body) {
            return keys;
        }
        body.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }

    async fn publish(&self, channel: &str, message: &str) -> bool {
        self.command_ok("PUBLISH", vec![channel, message]).await
    }
}
