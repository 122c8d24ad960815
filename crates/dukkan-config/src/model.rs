// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Dukkan order resolver.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Top-level Dukkan configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DukkanConfig {
    /// Message parsing and fallback behavior.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Similarity thresholds and tie detection.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Disambiguation session and duplicate suppression windows.
    #[serde(default)]
    pub sessions: SessionConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Message parsing and fallback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// City assumed when the message names no recognizable city.
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Require a color or size token before a line counts as a product line.
    /// Relax for catalogs whose products are ordered by bare name.
    #[serde(default = "default_strict_product_lines")]
    pub strict_product_lines: bool,

    /// Minimum normalized length for a line to qualify as a product line.
    #[serde(default = "default_min_product_line_chars")]
    pub min_product_line_chars: usize,

    /// Local mobile prefix a phone line must start with.
    #[serde(default = "default_phone_prefix")]
    pub phone_prefix: String,

    /// Exact digit count of a valid phone line.
    #[serde(default = "default_phone_length")]
    pub phone_length: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            strict_product_lines: default_strict_product_lines(),
            min_product_line_chars: default_min_product_line_chars(),
            phone_prefix: default_phone_prefix(),
            phone_length: default_phone_length(),
        }
    }
}

fn default_city() -> String {
    "بغداد".to_string()
}

fn default_strict_product_lines() -> bool {
    true
}

fn default_min_product_line_chars() -> usize {
    3
}

fn default_phone_prefix() -> String {
    "07".to_string()
}

fn default_phone_length() -> usize {
    11
}

/// Similarity thresholds applied by the geography and product resolvers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    /// Minimum score for a candidate to appear in a ranked alternates list.
    #[serde(default = "default_candidate_floor")]
    pub candidate_floor: f64,

    /// Score at which a city match is accepted without falling back to the
    /// default city.
    #[serde(default = "default_city_auto_accept")]
    pub city_auto_accept: f64,

    /// Score at which a region or product match counts as good. Exactly one
    /// good candidate resolves silently; several open a selection session.
    #[serde(default = "default_good_match")]
    pub good_match: f64,

    /// Two top candidates closer than this are a tie and force a selection
    /// session.
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            candidate_floor: default_candidate_floor(),
            city_auto_accept: default_city_auto_accept(),
            good_match: default_good_match(),
            tie_epsilon: default_tie_epsilon(),
        }
    }
}

fn default_candidate_floor() -> f64 {
    0.5
}

fn default_city_auto_accept() -> f64 {
    0.7
}

fn default_good_match() -> f64 {
    0.75
}

fn default_tie_epsilon() -> f64 {
    0.05
}

/// Disambiguation session TTL and duplicate suppression window.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Minutes a pending selection stays answerable.
    #[serde(default = "default_selection_ttl_minutes")]
    pub selection_ttl_minutes: i64,

    /// Trailing minutes within which an identical message is a duplicate.
    #[serde(default = "default_dedupe_window_minutes")]
    pub dedupe_window_minutes: i64,
}

impl SessionConfig {
    /// Selection TTL as a duration.
    pub fn selection_ttl(&self) -> Duration {
        Duration::minutes(self.selection_ttl_minutes)
    }

    /// Duplicate suppression window as a duration.
    pub fn dedupe_window(&self) -> Duration {
        Duration::minutes(self.dedupe_window_minutes)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            selection_ttl_minutes: default_selection_ttl_minutes(),
            dedupe_window_minutes: default_dedupe_window_minutes(),
        }
    }
}

fn default_selection_ttl_minutes() -> i64 {
    10
}

fn default_dedupe_window_minutes() -> i64 {
    10
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    "dukkan.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}
