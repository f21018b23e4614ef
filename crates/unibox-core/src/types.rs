// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Unibox workspace.
//!
//! Queue payloads serialize as camelCase JSON -- that is the wire format
//! anything else inspecting the remote store expects, so the serde shape
//! here is part of the external contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A messaging platform with its own delivery queue and consumer task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Telegram,
    Messenger,
    Twitter,
    Sms,
}

impl Platform {
    /// All supported platforms, in the order their processors are spawned.
    pub const ALL: [Platform; 4] = [
        Platform::Telegram,
        Platform::Messenger,
        Platform::Twitter,
        Platform::Sms,
    ];
}

/// A delivery statistics event, keyed per platform in the stats counters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Queued,
    Sent,
    Failed,
}

impl EventType {
    /// All counter event types, in snapshot display order.
    pub const ALL: [EventType; 3] = [EventType::Queued, EventType::Sent, EventType::Failed];
}

/// A message attachment reference carried alongside the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment kind as reported by the source platform ("image", "video", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Location of the attachment payload.
    pub url: String,
}

/// The unit of outbound work in the delivery queue.
///
/// A `retry_count` past the configured maximum moves the message to the
/// dead-letter list; it never re-enters the live queue after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMessage {
    /// Opaque unique id per logical message. Stable across retries.
    pub id: String,
    pub platform: Platform,
    pub sender: String,
    /// Delivery target. Absence is a permanent error, never retried.
    #[serde(default)]
    pub recipient_id: Option<String>,
    pub content: String,
    /// Unix epoch milliseconds at creation.
    pub timestamp: i64,
    #[serde(default = "default_message_type")]
    pub message_type: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub retry_count: u32,
    /// Unix epoch milliseconds of the most recent retry, if any.
    #[serde(default)]
    pub last_retry_at: Option<i64>,
}

fn default_message_type() -> String {
    "text".to_string()
}

impl QueueMessage {
    /// Creates a new text message with a generated id and current timestamp.
    pub fn new(
        platform: Platform,
        sender: impl Into<String>,
        recipient_id: Option<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            platform,
            sender: sender.into(),
            recipient_id,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            message_type: default_message_type(),
            attachments: Vec::new(),
            retry_count: 0,
            last_retry_at: None,
        }
    }
}

/// A message awaiting resubmission after a failed delivery.
///
/// Owned by the retry scheduler between the failure and the resubmission;
/// once pushed back onto the live queue, ownership transfers to the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryRecord {
    pub message: QueueMessage,
    /// Unix epoch milliseconds when the resubmission is due.
    pub scheduled_at: i64,
    pub target_platform: Platform,
}

/// Per-platform counter values in a stats snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCounts {
    pub queued: u64,
    pub sent: u64,
    pub failed: u64,
}

impl PlatformCounts {
    /// Returns the count for one event type.
    pub fn get(&self, event: EventType) -> u64 {
        match event {
            EventType::Queued => self.queued,
            EventType::Sent => self.sent,
            EventType::Failed => self.failed,
        }
    }

    /// Sets the count for one event type.
    pub fn set(&mut self, event: EventType, value: u64) {
        match event {
            EventType::Queued => self.queued = value,
            EventType::Sent => self.sent = value,
            EventType::Failed => self.failed = value,
        }
    }
}

/// A point-in-time view of the delivery counters, per platform.
///
/// Each platform is read independently, so cross-platform totals are
/// approximate under concurrent writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub platforms: BTreeMap<Platform, PlatformCounts>,
}

impl QueueStats {
    /// Returns the count for one platform and event, 0 when absent.
    pub fn count(&self, platform: Platform, event: EventType) -> u64 {
        self.platforms
            .get(&platform)
            .map(|c| c.get(event))
            .unwrap_or(0)
    }
}
