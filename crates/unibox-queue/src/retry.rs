// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry scheduling with exponential backoff and a dead-letter path.
//!
//! Decouples "a send failed" from "when and whether it is retried". The
//! backoff wait runs on a spawned task owned by the scheduler, so a
//! multi-second delay never blocks the platform's consumer loop from
//! draining the rest of its queue. Between the failure and the
//! resubmission, the pending retry is persisted under `msg:<id>`.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use unibox_config::model::QueueConfig;
use unibox_core::{keys, KvStore, QueueMessage, RetryRecord};

use crate::queue::DeliveryQueue;

/// Bounded exponential backoff: `delay = base_delay * 2^retry_count`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries allowed before dead-lettering. A message is dispatched at
    /// most `max_retries + 1` times.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &QueueConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }

    /// Backoff before the attempt following `retry_count` prior retries.
    pub fn delay(&self, retry_count: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry_count)
    }
}

/// What the scheduler decided to do with a failed message.
#[derive(Debug)]
pub enum RetryDisposition {
    /// A deferred resubmission task was spawned; the handle resolves once
    /// the message is back on the live queue.
    Scheduled(JoinHandle<()>),
    /// The message was moved to the dead-letter list. Terminal.
    DeadLettered,
}

/// Owns failed messages between the failure event and the resubmission.
#[derive(Clone)]
pub struct RetryScheduler {
    queue: DeliveryQueue,
    store: Arc<dyn KvStore>,
    policy: RetryPolicy,
}

impl RetryScheduler {
    pub fn new(queue: DeliveryQueue, store: Arc<dyn KvStore>, policy: RetryPolicy) -> Self {
        Self {
            queue,
            store,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Route a failed delivery: schedule a backed-off resubmission, or
    /// dead-letter when the retry budget is spent.
    ///
    /// A message with no recipient is a permanent delivery impossibility
    /// and short-circuits to the dead-letter list regardless of its
    /// retry count.
    pub async fn handle_failure(&self, mut msg: QueueMessage) -> RetryDisposition {
        if msg.recipient_id.is_none() {
            warn!(id = %msg.id, "message has no recipient, dead-lettering without retry");
            self.queue.dead_letter(&msg).await;
            return RetryDisposition::DeadLettered;
        }

        if msg.retry_count >= self.policy.max_retries {
            info!(id = %msg.id, retry_count = msg.retry_count, "retry budget exhausted");
            self.queue.dead_letter(&msg).await;
            return RetryDisposition::DeadLettered;
        }

        let delay = self.policy.delay(msg.retry_count);
        msg.retry_count += 1;
        msg.last_retry_at = Some(chrono::Utc::now().timestamp_millis());

        let record = RetryRecord {
            target_platform: msg.platform,
            scheduled_at: chrono::Utc::now().timestamp_millis() + delay.as_millis() as i64,
            message: msg.clone(),
        };
        let record_key = keys::message(&msg.id);
        match serde_json::to_string(&record) {
            Ok(json) => {
                self.store.set(&record_key, &json).await;
            }
            Err(e) => {
                warn!(id = %msg.id, error = %e, "retry record failed to serialize");
            }
        }

        info!(
            id = %msg.id,
            platform = %msg.platform,
            retry_count = msg.retry_count,
            delay_ms = delay.as_millis() as u64,
            "delivery failed, retry scheduled"
        );

        let queue = self.queue.clone();
        let store = self.store.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            queue.resubmit(&msg).await;
            store.delete(&record_key).await;
        });

        RetryDisposition::Scheduled(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unibox_core::{EventType, Platform};
    use unibox_test_utils::MemoryStore;

    fn scheduler(store: Arc<MemoryStore>) -> (DeliveryQueue, RetryScheduler) {
        let queue = DeliveryQueue::new(store.clone());
        let scheduler = RetryScheduler::new(queue.clone(), store, RetryPolicy::default());
        (queue, scheduler)
    }

    fn message(retry_count: u32) -> QueueMessage {
        let mut msg =
            QueueMessage::new(Platform::Telegram, "app", Some("123".to_string()), "hi");
        msg.retry_count = retry_count;
        msg
    }

    #[test]
    fn delays_double_per_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(0), Duration::from_secs(1));
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(2), Duration::from_secs(4));

        let custom = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_millis(250),
        };
        assert_eq!(custom.delay(3), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_resubmits_at_tail_with_bumped_count() {
        let store = Arc::new(MemoryStore::new());
        let (queue, scheduler) = scheduler(store.clone());

        let msg = message(0);
        let id = msg.id.clone();

        match scheduler.handle_failure(msg).await {
            RetryDisposition::Scheduled(handle) => {
                // Retry record is persisted while the wait is pending.
                let record_json = store.get(&keys::message(&id)).await.unwrap();
                let record: RetryRecord = serde_json::from_str(&record_json).unwrap();
                assert_eq!(record.message.retry_count, 1);
                assert_eq!(record.target_platform, Platform::Telegram);

                handle.await.unwrap();
            }
            RetryDisposition::DeadLettered => panic!("expected a scheduled retry"),
        }

        let payload = queue.pop(Platform::Telegram).await.unwrap();
        let resubmitted: QueueMessage = serde_json::from_str(&payload).unwrap();
        assert_eq!(resubmitted.id, id);
        assert_eq!(resubmitted.retry_count, 1);
        assert!(resubmitted.last_retry_at.is_some());

        // The persisted record is cleared after resubmission.
        assert_eq!(store.get(&keys::message(&id)).await, None);
    }

    #[tokio::test]
    async fn exhausted_budget_dead_letters_unmodified_message() {
        let store = Arc::new(MemoryStore::new());
        let (queue, scheduler) = scheduler(store.clone());

        let msg = message(3);
        let id = msg.id.clone();

        match scheduler.handle_failure(msg).await {
            RetryDisposition::DeadLettered => {}
            RetryDisposition::Scheduled(_) => panic!("expected dead-letter"),
        }

        let contents = store.list_contents("telegram_failed").await;
        assert_eq!(contents.len(), 1);
        let dead: QueueMessage = serde_json::from_str(&contents[0]).unwrap();
        assert_eq!(dead.id, id);
        assert_eq!(dead.retry_count, 3);

        assert_eq!(store.list_len("queue:telegram").await, 0);
        let snapshot = queue.stats().snapshot().await;
        assert_eq!(snapshot.count(Platform::Telegram, EventType::Failed), 1);
    }

    #[tokio::test]
    async fn missing_recipient_is_never_retried() {
        let store = Arc::new(MemoryStore::new());
        let (_, scheduler) = scheduler(store.clone());

        let mut msg = message(0);
        msg.recipient_id = None;

        match scheduler.handle_failure(msg).await {
            RetryDisposition::DeadLettered => {}
            RetryDisposition::Scheduled(_) => panic!("expected dead-letter"),
        }

        assert_eq!(store.list_len("telegram_failed").await, 1);
        assert_eq!(store.list_len("queue:telegram").await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_does_not_resubmit_early() {
        let store = Arc::new(MemoryStore::new());
        let (_, scheduler) = scheduler(store.clone());

        // retry_count 2 => 4s delay.
        let RetryDisposition::Scheduled(handle) = scheduler.handle_failure(message(2)).await
        else {
            panic!("expected a scheduled retry");
        };

        tokio::time::advance(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.list_len("queue:telegram").await, 0);

        handle.await.unwrap();
        assert_eq!(store.list_len("queue:telegram").await, 1);
    }
}
