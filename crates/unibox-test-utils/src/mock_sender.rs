// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock platform sender for deterministic testing.
//!
//! `MockSender` implements `PlatformSender` with scripted outcomes and
//! captured dispatches for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use unibox_core::{PlatformSender, UniboxError};

/// Outcome of one scripted `send()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The platform accepted the message (`Ok(true)`).
    Delivered,
    /// The platform rejected the message (`Ok(false)`).
    Rejected,
    /// The send call itself errored (`Err(..)`).
    Errored,
}

/// A mock platform sender.
///
/// Each `send()` call is recorded, then resolved from the scripted outcome
/// queue, falling back to the default outcome once the script is exhausted.
pub struct MockSender {
    name: String,
    default_outcome: SendOutcome,
    scripted: Mutex<VecDeque<SendOutcome>>,
    dispatches: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockSender {
    /// A sender that delivers everything.
    pub fn succeeding(name: impl Into<String>) -> Self {
        Self::with_default(name, SendOutcome::Delivered)
    }

    /// A sender that rejects everything.
    pub fn failing(name: impl Into<String>) -> Self {
        Self::with_default(name, SendOutcome::Rejected)
    }

    /// A sender with an explicit default outcome.
    pub fn with_default(name: impl Into<String>, default_outcome: SendOutcome) -> Self {
        Self {
            name: name.into(),
            default_outcome,
            scripted: Mutex::new(VecDeque::new()),
            dispatches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue one scripted outcome ahead of the default.
    pub async fn script(&self, outcome: SendOutcome) {
        self.scripted.lock().await.push_back(outcome);
    }

    /// All `(recipient_id, content)` pairs dispatched so far, in order.
    pub async fn dispatches(&self) -> Vec<(String, String)> {
        self.dispatches.lock().await.clone()
    }

    /// Number of dispatch attempts made against this sender.
    pub async fn dispatch_count(&self) -> usize {
        self.dispatches.lock().await.len()
    }
}

#[async_trait]
impl PlatformSender for MockSender {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, recipient_id: &str, content: &str) -> Result<bool, UniboxError> {
        self.dispatches
            .lock()
            .await
            .push((recipient_id.to_string(), content.to_string()));

        let outcome = self
            .scripted
            .lock()
            .await
            .pop_front()
            .unwrap_or(self.default_outcome);

        match outcome {
            SendOutcome::Delivered => Ok(true),
            SendOutcome::Rejected => Ok(false),
            SendOutcome::Errored => Err(UniboxError::Sender {
                message: format!("{}: scripted send error", self.name),
                source: None,
            }),
        }
    }
}
