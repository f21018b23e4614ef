// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery queue layer for the Unibox core.
//!
//! Sits between "a reply was composed" and "the platform API accepted it":
//! a per-platform FIFO queue over the remote store ([`DeliveryQueue`]), one
//! long-lived consumer task per platform ([`DeliveryProcessor`]), an
//! exponential-backoff retry scheduler with a dead-letter path
//! ([`RetryScheduler`]), and monotonic delivery counters ([`StatsRecorder`]).
//!
//! The remote store is the only shared mutable resource; the tasks here
//! hold no in-process locks and rely on the store's atomic list pop for
//! "at most one consumer dequeues a given message".

pub mod processor;
pub mod queue;
pub mod retry;
pub mod stats;

pub use processor::DeliveryProcessor;
pub use queue::DeliveryQueue;
pub use retry::{RetryDisposition, RetryPolicy, RetryScheduler};
pub use stats::StatsRecorder;
