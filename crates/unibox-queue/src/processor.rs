// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-platform delivery consumer loops.
//!
//! One long-lived task per platform: pop from `queue:<platform>`, dispatch
//! to the registered [`PlatformSender`], count the outcome, and route
//! failures through the [`RetryScheduler`]. Each loop is independently
//! schedulable; an idle or backing-off platform never delays the others.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use unibox_config::model::QueueConfig;
use unibox_core::{EventType, KvStore, Platform, PlatformSender, QueueMessage, UniboxError};

use crate::queue::DeliveryQueue;
use crate::retry::{RetryPolicy, RetryScheduler};
use crate::stats::StatsRecorder;

/// What one loop iteration accomplished.
enum Progress {
    /// The queue was empty; sleep the poll interval before re-polling.
    Idle,
    /// A payload was dequeued and fully handled; poll again immediately.
    Worked,
}

/// Drives the per-platform consumer loops.
///
/// Senders are registered in a `platform -> sender` table at construction;
/// adding a platform means one more table entry, not new branching logic.
pub struct DeliveryProcessor {
    queue: DeliveryQueue,
    scheduler: RetryScheduler,
    senders: HashMap<Platform, Arc<dyn PlatformSender>>,
    poll_interval: Duration,
    error_backoff: Duration,
}

impl DeliveryProcessor {
    pub fn new(
        store: Arc<dyn KvStore>,
        senders: HashMap<Platform, Arc<dyn PlatformSender>>,
        config: &QueueConfig,
    ) -> Self {
        let queue = DeliveryQueue::new(store.clone());
        let scheduler =
            RetryScheduler::new(queue.clone(), store, RetryPolicy::from_config(config));
        Self {
            queue,
            scheduler,
            senders,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            error_backoff: Duration::from_secs(config.error_backoff_secs),
        }
    }

    /// The queue handle sharing this processor's store.
    pub fn queue(&self) -> &DeliveryQueue {
        &self.queue
    }

    /// The stats recorder sharing this processor's store.
    pub fn stats(&self) -> &StatsRecorder {
        self.queue.stats()
    }

    /// Spawn one consumer task per platform with a registered sender.
    ///
    /// Each task runs until the token is cancelled; cancellation lets the
    /// current iteration finish, so no message is left half-dequeued.
    pub fn spawn_all(self: &Arc<Self>, token: &CancellationToken) -> Vec<JoinHandle<()>> {
        Platform::ALL
            .into_iter()
            .filter(|platform| {
                let registered = self.senders.contains_key(platform);
                if !registered {
                    info!(platform = %platform, "no sender registered, processor not started");
                }
                registered
            })
            .map(|platform| {
                let this = Arc::clone(self);
                let token = token.clone();
                tokio::spawn(async move { this.run_platform(platform, token).await })
            })
            .collect()
    }

    /// One platform's consumer loop. Public for tests and embedding; most
    /// callers want [`spawn_all`](Self::spawn_all).
    pub async fn run_platform(&self, platform: Platform, token: CancellationToken) {
        info!(platform = %platform, "delivery processor started");

        loop {
            if token.is_cancelled() {
                break;
            }

            match self.step(platform).await {
                Ok(Progress::Worked) => {}
                Ok(Progress::Idle) => {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tokio::time::sleep(self.poll_interval) => {}
                    }
                }
                Err(e) => {
                    // The loop must never die on one message's failure.
                    error!(platform = %platform, error = %e, "processor error, backing off");
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tokio::time::sleep(self.error_backoff) => {}
                    }
                }
            }
        }

        info!(platform = %platform, "delivery processor stopped");
    }

    /// Pop and fully handle one payload.
    async fn step(&self, platform: Platform) -> Result<Progress, UniboxError> {
        let Some(payload) = self.queue.pop(platform).await else {
            return Ok(Progress::Idle);
        };

        let msg: QueueMessage = match serde_json::from_str(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                // Retrying a corrupt payload cannot succeed; drop it.
                warn!(platform = %platform, error = %e, "dropping malformed queue payload");
                self.stats().record(platform, EventType::Failed).await;
                return Ok(Progress::Worked);
            }
        };

        self.dispatch(platform, msg).await?;
        Ok(Progress::Worked)
    }

    /// Exactly one sender call per dequeue; failures go to the scheduler.
    async fn dispatch(&self, platform: Platform, msg: QueueMessage) -> Result<(), UniboxError> {
        let Some(recipient) = msg.recipient_id.clone() else {
            warn!(id = %msg.id, "message has no recipient, dead-lettering without dispatch");
            self.queue.dead_letter(&msg).await;
            return Ok(());
        };

        let Some(sender) = self.senders.get(&platform) else {
            // Keep the message in the retry pipeline, then back off: a
            // platform with no sender would otherwise drain its queue into
            // a hot loop of instant failures.
            self.scheduler.handle_failure(msg).await;
            return Err(UniboxError::Internal(format!(
                "no sender registered for {platform}"
            )));
        };

        match sender.send(&recipient, &msg.content).await {
            Ok(true) => {
                self.stats().record(platform, EventType::Sent).await;
                debug!(id = %msg.id, platform = %platform, sender = sender.name(), "delivered");
            }
            Ok(false) => {
                warn!(id = %msg.id, sender = sender.name(), "platform rejected message");
                self.scheduler.handle_failure(msg).await;
            }
            Err(e) => {
                warn!(id = %msg.id, sender = sender.name(), error = %e, "send failed");
                self.scheduler.handle_failure(msg).await;
            }
        }
        Ok(())
    }
}
