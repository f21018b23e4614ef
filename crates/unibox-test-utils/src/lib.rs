// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Unibox integration tests.
//!
//! Provides mock implementations of the core traits for fast,
//! deterministic, CI-runnable tests without a remote store.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory `KvStore` with TTL, list, counter, and
//!   publish support, plus call counting and failure injection
//! - [`MockSender`] - Mock platform sender with scripted outcomes and
//!   captured dispatches

pub mod memory_store;
pub mod mock_sender;

pub use memory_store::MemoryStore;
pub use mock_sender::{MockSender, SendOutcome};
