// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event fan-out over the store's publish primitive.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use unibox_core::{KvStore, QueueMessage};

/// Channel carrying full message payloads.
pub const CHANNEL_MESSAGES: &str = "messages";
/// Channel carrying typing-state transitions.
pub const CHANNEL_TYPING: &str = "typing";
/// Channel carrying user presence transitions.
pub const CHANNEL_USER_STATUS: &str = "user_status";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TypingEvent<'a> {
    chat_id: &'a str,
    user_id: &'a str,
    is_typing: bool,
    timestamp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserStatusEvent<'a> {
    user_id: &'a str,
    status: &'a str,
    timestamp: i64,
}

/// Publishes events to the fixed fan-out channels.
///
/// Publishes carry no delivery guarantee and are never retried; a false
/// return only ever reaches a log line. Subscribers are external to this
/// crate.
#[derive(Clone)]
pub struct Broadcaster {
    store: Arc<dyn KvStore>,
}

impl Broadcaster {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Fan out a message to the `messages` channel.
    pub async fn broadcast_message(&self, msg: &QueueMessage) {
        match serde_json::to_string(msg) {
            Ok(payload) => self.publish(CHANNEL_MESSAGES, &payload).await,
            Err(e) => warn!(id = %msg.id, error = %e, "message broadcast skipped"),
        }
    }

    /// Fan out a typing-state change to the `typing` channel.
    pub async fn set_typing_indicator(&self, chat_id: &str, user_id: &str, is_typing: bool) {
        let event = TypingEvent {
            chat_id,
            user_id,
            is_typing,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        self.publish_event(CHANNEL_TYPING, &event).await;
    }

    /// Fan out a presence change to the `user_status` channel.
    pub async fn update_user_status(&self, user_id: &str, status: &str) {
        let event = UserStatusEvent {
            user_id,
            status,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        self.publish_event(CHANNEL_USER_STATUS, &event).await;
    }

    async fn publish_event<T: Serialize>(&self, channel: &str, event: &T) {
        match serde_json::to_string(event) {
            Ok(payload) => self.publish(channel, &payload).await,
            Err(e) => warn!(channel, error = %e, "broadcast skipped"),
        }
    }

    async fn publish(&self, channel: &str, payload: &str) {
        if self.store.publish(channel, payload).await {
            debug!(channel, "event published");
        } else {
            warn!(channel, "publish failed, event dropped");
        }
    }
}
