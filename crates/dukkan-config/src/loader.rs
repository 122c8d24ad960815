// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dukkan.toml` > `~/.config/dukkan/dukkan.toml` >
//! `/etc/dukkan/dukkan.toml` with environment variable overrides via the
//! `DUKKAN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DukkanConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dukkan/dukkan.toml` (system-wide)
/// 3. `~/.config/dukkan/dukkan.toml` (user XDG config)
/// 4. `./dukkan.toml` (local directory)
/// 5. `DUKKAN_*` environment variables
pub fn load_config() -> Result<DukkanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DukkanConfig::default()))
        .merge(Toml::file("/etc/dukkan/dukkan.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dukkan/dukkan.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dukkan.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<DukkanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DukkanConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DukkanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DukkanConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores themselves: `DUKKAN_RESOLVER_DEFAULT_CITY` must map to
/// `resolver.default_city`, not `resolver.default.city`.
fn env_provider() -> Env {
    Env::prefixed("DUKKAN_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: DUKKAN_MATCHING_GOOD_MATCH -> "matching_good_match"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("resolver_", "resolver.", 1)
            .replacen("matching_", "matching.", 1)
            .replacen("sessions_", "sessions.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
