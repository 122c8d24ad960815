// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Dukkan order resolver.

use thiserror::Error;

/// The primary error type used across the Dukkan collaborator traits and core
/// operations.
///
/// This covers infrastructure failures only. Expected business outcomes
/// (unknown region, ambiguous match, out-of-stock variant, duplicate message,
/// malformed input) are modeled as [`crate::types::ResolveOutcome`] values and
/// never surface as errors.
#[derive(Debug, Error)]
pub enum DukkanError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Reference-data store errors (catalog or geography lookups failing).
    #[error("reference store error: {message}")]
    Reference {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Notification delivery errors (the host channel rejected or dropped a note).
    #[error("notify error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Order persistence errors (the downstream sink refused the order).
    #[error("order sink error: {message}")]
    Sink {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
