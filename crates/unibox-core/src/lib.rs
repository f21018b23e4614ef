// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Unibox delivery core.
//!
//! This crate provides the foundational trait definitions, error types,
//! store key naming, and common types used throughout the Unibox workspace.
//! The store client and platform senders implement traits defined here.

pub mod error;
pub mod keys;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::UniboxError;
pub use types::{EventType, Platform, QueueMessage, QueueStats, RetryRecord};

pub use traits::{KvStore, PlatformSender};
