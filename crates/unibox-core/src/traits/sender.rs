// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform sender trait for per-platform delivery integrations.

use async_trait::async_trait;

use crate::error::UniboxError;

/// Delivers a dequeued message to one platform's API.
///
/// Implementations live outside this core (Telegram/Messenger/Twitter bot
/// clients, device SMS). The processor builds a `platform -> sender` table
/// at startup; adding a platform means registering one more table entry.
///
/// A retried send may duplicate-deliver -- the queue targets at-least-once
/// semantics, and senders must tolerate that.
#[async_trait]
pub trait PlatformSender: Send + Sync + 'static {
    /// Human-readable name of this sender, for logging.
    fn name(&self) -> &str;

    /// Attempts delivery. `Ok(false)` and `Err(_)` are both treated as a
    /// retryable failure by the processor; exactly one call is made per
    /// dequeue.
    async fn send(&self, recipient_id: &str, content: &str) -> Result<bool, UniboxError>;
}
