// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as threshold ordering and positive window lengths.

use thiserror::Error;

use crate::model::DukkanConfig;

/// A configuration error, either a parse failure bubbled up from Figment or
/// a semantic validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration could not be parsed at all.
    #[error("configuration parse error: {0}")]
    Parse(String),

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Render a list of configuration errors as one line per error.
pub fn render_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &DukkanConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let mut validation = |message: String| {
        errors.push(ConfigError::Validation { message });
    };

    // Thresholds live on the unit interval.
    for (name, value) in [
        ("matching.candidate_floor", config.matching.candidate_floor),
        ("matching.city_auto_accept", config.matching.city_auto_accept),
        ("matching.good_match", config.matching.good_match),
        ("matching.tie_epsilon", config.matching.tie_epsilon),
    ] {
        if !(0.0..=1.0).contains(&value) {
            validation(format!("{name} must be within [0, 1], got {value}"));
        }
    }

    if config.matching.candidate_floor > config.matching.city_auto_accept {
        validation(format!(
            "matching.candidate_floor ({}) must not exceed matching.city_auto_accept ({})",
            config.matching.candidate_floor, config.matching.city_auto_accept
        ));
    }

    if config.matching.city_auto_accept > config.matching.good_match {
        validation(format!(
            "matching.city_auto_accept ({}) must not exceed matching.good_match ({})",
            config.matching.city_auto_accept, config.matching.good_match
        ));
    }

    if config.matching.tie_epsilon >= 0.5 {
        validation(format!(
            "matching.tie_epsilon must be below 0.5, got {}",
            config.matching.tie_epsilon
        ));
    }

    if config.sessions.selection_ttl_minutes < 1 {
        validation(format!(
            "sessions.selection_ttl_minutes must be at least 1, got {}",
            config.sessions.selection_ttl_minutes
        ));
    }

    if config.sessions.dedupe_window_minutes < 1 {
        validation(format!(
            "sessions.dedupe_window_minutes must be at least 1, got {}",
            config.sessions.dedupe_window_minutes
        ));
    }

    if config.resolver.default_city.trim().is_empty() {
        validation("resolver.default_city must not be empty".to_string());
    }

    let prefix = config.resolver.phone_prefix.trim();
    if prefix.is_empty() {
        validation("resolver.phone_prefix must not be empty".to_string());
    } else if !prefix.chars().all(|c| c.is_ascii_digit()) {
        validation(format!(
            "resolver.phone_prefix must be ASCII digits, got `{prefix}`"
        ));
    }

    if config.resolver.phone_length < prefix.chars().count()
        || config.resolver.phone_length > 15
    {
        validation(format!(
            "resolver.phone_length must be between the prefix length and 15, got {}",
            config.resolver.phone_length
        ));
    }

    if config.resolver.min_product_line_chars < 1 {
        validation("resolver.min_product_line_chars must be at least 1".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        validation("storage.database_path must not be empty".to_string());
    }

    if config.storage.busy_timeout_ms == 0 {
        validation("storage.busy_timeout_ms must be positive".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = DukkanConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn out_of_range_threshold_fails_validation() {
        let mut config = DukkanConfig::default();
        config.matching.good_match = 1.3;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("good_match"))));
    }

    #[test]
    fn floor_above_auto_accept_fails_validation() {
        let mut config = DukkanConfig::default();
        config.matching.candidate_floor = 0.9;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("candidate_floor"))));
    }

    #[test]
    fn zero_ttl_fails_validation() {
        let mut config = DukkanConfig::default();
        config.sessions.selection_ttl_minutes = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("selection_ttl_minutes"))));
    }

    #[test]
    fn non_digit_phone_prefix_fails_validation() {
        let mut config = DukkanConfig::default();
        config.resolver.phone_prefix = "٠٧".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("phone_prefix"))));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = DukkanConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn multiple_problems_are_all_reported() {
        let mut config = DukkanConfig::default();
        config.matching.tie_epsilon = 0.6;
        config.sessions.dedupe_window_minutes = 0;
        config.resolver.default_city = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
        let rendered = render_errors(&errors);
        assert!(rendered.contains("tie_epsilon"));
        assert!(rendered.contains("dedupe_window_minutes"));
        assert!(rendered.contains("default_city"));
    }
}
