// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Unibox delivery core.

use thiserror::Error;

/// The primary error type used across Unibox traits and core operations.
#[derive(Debug, Error)]
pub enum UniboxError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote store errors (transport failure, non-200 response, bad payload).
    ///
    /// These never escape the store client's `KvStore` surface -- they are
    /// absorbed into sentinel return values there -- but the client and the
    /// binary use this variant for setup failures and diagnostics.
    #[error("store error: {message}")]
    Store {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Platform sender errors (delivery endpoint failure, rejected payload).
    #[error("sender error: {message}")]
    Sender {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Queue payload could not be serialized or deserialized.
    #[error("serialization error: {source}")]
    Serialization {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
