// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Dukkan order resolver.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and collect-all-errors semantic validation.
//!
//! # Usage
//!
//! ```no_run
//! use dukkan_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Default city: {}", config.resolver.default_city);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{DukkanConfig, MatchingConfig, ResolverConfig, SessionConfig, StorageConfig};
pub use validation::{render_errors, validate_config, ConfigError};

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts it into a [`ConfigError::Parse`]
pub fn load_and_validate() -> Result<DukkanConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse(err.to_string())]),
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<DukkanConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse(err.to_string())]),
    }
}
