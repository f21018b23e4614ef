// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-platform delivery counters.
//!
//! Counters live in the remote store under `stats:<platform>:<event>` and
//! only ever increase; there is no decrement or reset. A snapshot reads
//! each platform independently, so cross-platform totals are approximate
//! under concurrent writes.

use std::sync::Arc;

use tracing::trace;

use unibox_core::types::PlatformCounts;
use unibox_core::{keys, EventType, KvStore, Platform, QueueStats};

/// Records and reads the monotonic delivery counters.
#[derive(Clone)]
pub struct StatsRecorder {
    store: Arc<dyn KvStore>,
}

impl StatsRecorder {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Increment one counter. The store absorbs failures into a 0 return,
    /// which this layer ignores entirely.
    pub async fn record(&self, platform: Platform, event: EventType) {
        let value = self.store.increment(&keys::stats(platform, event)).await;
        trace!(platform = %platform, event = %event, value, "stat recorded");
    }

    /// Assemble a point-in-time snapshot of all counters.
    ///
    /// Scans `stats:<platform>:*` per platform and reads each key. A
    /// counter that cannot be read (or vanishes mid-scan) reads as 0.
    pub async fn snapshot(&self) -> QueueStats {
        let mut snapshot = QueueStats::default();

        for platform in Platform::ALL {
            let mut counts = PlatformCounts::default();
            for key in self.store.scan_keys(&keys::stats_pattern(platform)).await {
                let Some(event) = keys::stats_event_from_key(&key) else {
                    continue;
                };
                let value = self
                    .store
                    .get(&key)
                    .await
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(0);
                counts.set(event, value);
            }
            snapshot.platforms.insert(platform, counts);
        }

        snapshot
    }
}
