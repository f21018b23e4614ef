// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the Unibox collaborator seams.
//!
//! Both traits use `#[async_trait]` for dynamic dispatch compatibility:
//! the queue, presence, and stats layers hold an `Arc<dyn KvStore>`, and
//! the processor holds its senders as `Arc<dyn PlatformSender>`.

pub mod kv;
pub mod sender;

pub use kv::KvStore;
pub use sender::PlatformSender;
