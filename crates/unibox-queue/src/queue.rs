// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable per-platform delivery queue over the remote store.
//!
//! One ordered list per platform (`queue:<platform>`) plus a dead-letter
//! list (`<platform>_failed`). FIFO order is scoped to one platform's live
//! queue; a retried message re-enters at the tail.

use std::sync::Arc;

use tracing::{debug, warn};

use unibox_core::{keys, EventType, KvStore, Platform, QueueMessage};

use crate::stats::StatsRecorder;

/// The delivery queue client.
///
/// Producers call [`enqueue`](Self::enqueue); the per-platform processors
/// call [`pop`](Self::pop). All state lives in the remote store -- this
/// type is a cheap clonable handle.
#[derive(Clone)]
pub struct DeliveryQueue {
    store: Arc<dyn KvStore>,
    stats: StatsRecorder,
}

impl DeliveryQueue {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let stats = StatsRecorder::new(store.clone());
        Self { store, stats }
    }

    /// The stats recorder sharing this queue's store.
    pub fn stats(&self) -> &StatsRecorder {
        &self.stats
    }

    /// Enqueue an outgoing message on its platform's queue tail and count
    /// it as `queued`.
    ///
    /// Never blocks on delivery. On store failure the message is dropped
    /// with a warning -- producers get `false` but no error, matching the
    /// store client's never-throws contract.
    pub async fn enqueue(&self, msg: &QueueMessage) -> bool {
        let Some(payload) = serialize(msg) else {
            return false;
        };
        if !self
            .store
            .list_push(&keys::queue(msg.platform), &payload)
            .await
        {
            warn!(id = %msg.id, platform = %msg.platform, "enqueue dropped: store rejected push");
            return false;
        }
        self.stats.record(msg.platform, EventType::Queued).await;
        debug!(id = %msg.id, platform = %msg.platform, "message queued");
        true
    }

    /// Re-enter a retried message at the queue tail.
    ///
    /// Unlike [`enqueue`](Self::enqueue) this does not touch the `queued`
    /// counter; the message was already counted when first enqueued.
    pub async fn resubmit(&self, msg: &QueueMessage) -> bool {
        let Some(payload) = serialize(msg) else {
            return false;
        };
        let pushed = self
            .store
            .list_push(&keys::queue(msg.platform), &payload)
            .await;
        if pushed {
            debug!(id = %msg.id, retry_count = msg.retry_count, "message resubmitted");
        } else {
            warn!(id = %msg.id, "resubmit dropped: store rejected push");
        }
        pushed
    }

    /// Dequeue the head payload of one platform's queue, `None` when empty
    /// (or when the store is unreachable -- indistinguishable by design).
    pub async fn pop(&self, platform: Platform) -> Option<String> {
        self.store.list_pop(&keys::queue(platform)).await
    }

    /// Move a message to the platform's dead-letter list and count it as
    /// `failed`. Terminal: nothing reprocesses the dead-letter list.
    pub async fn dead_letter(&self, msg: &QueueMessage) -> bool {
        let Some(payload) = serialize(msg) else {
            return false;
        };
        let pushed = self
            .store
            .list_push(&keys::dead_letter(msg.platform), &payload)
            .await;
        if pushed {
            warn!(id = %msg.id, platform = %msg.platform, retry_count = msg.retry_count,
                  "message dead-lettered");
        } else {
            warn!(id = %msg.id, "dead-letter push failed, message dropped");
        }
        self.stats.record(msg.platform, EventType::Failed).await;
        pushed
    }
}

fn serialize(msg: &QueueMessage) -> Option<String> {
    match serde_json::to_string(msg) {
        Ok(payload) => Some(payload),
        Err(e) => {
            warn!(id = %msg.id, error = %e, "queue message failed to serialize");
            None
        }
    }
}
