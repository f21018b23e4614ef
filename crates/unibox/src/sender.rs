// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound webhook sender.
//!
//! Each configured platform gets one of these, POSTing a small JSON payload
//! to that platform's relay endpoint. The platform-specific API shapes live
//! behind the relay; this side only distinguishes accepted, rejected, and
//! unreachable.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use unibox_core::{PlatformSender, UniboxError};

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload<'a> {
    recipient_id: &'a str,
    content: &'a str,
}

/// Delivers messages by POSTing to a fixed webhook URL.
pub struct WebhookSender {
    name: String,
    client: reqwest::Client,
    url: String,
}

impl WebhookSender {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Result<Self, UniboxError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| UniboxError::Sender {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            name: name.into(),
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PlatformSender for WebhookSender {
    fn name(&self) -> &str {
        &self.name
    }

    /// `Ok(true)` when the relay accepted the payload, `Ok(false)` when it
    /// answered with a non-success status, `Err` when it was unreachable.
    /// The caller treats the last two the same way (retry), so the split
    /// only matters for logging.
    async fn send(&self, recipient_id: &str, content: &str) -> Result<bool, UniboxError> {
        let payload = WebhookPayload {
            recipient_id,
            content,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| UniboxError::Sender {
                message: format!("{} webhook unreachable", self.name),
                source: Some(Box::new(e)),
            })?;

        let accepted = response.status().is_success();
        debug!(sender = %self.name, status = %response.status(), accepted, "webhook responded");
        Ok(accepted)
    }
}
