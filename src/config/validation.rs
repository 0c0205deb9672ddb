//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, intervals > 0)
//! - Detect empty or duplicate mount paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GuardConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GuardConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("prober.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("collector.interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("collector.mounts contains an empty path")]
    EmptyMount,

    #[error("collector.mounts lists '{0}' more than once")]
    DuplicateMount(String),

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.prober.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.collector.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    let mut seen = HashSet::new();
    for mount in &config.collector.mounts {
        if mount.trim().is_empty() {
            errors.push(ValidationError::EmptyMount);
        } else if !seen.insert(mount.as_str()) {
            errors.push(ValidationError::DuplicateMount(mount.clone()));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
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
    fn test_default_config_is_valid() {
        assert!(validate_config(&GuardConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = GuardConfig::default();
        config.prober.timeout_ms = 0;
        config.collector.interval_secs = 0;
        config.collector.mounts = vec!["/a".into(), "".into(), "/a".into()];
        config.observability.log_level = "loud".into();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();

        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroTimeout,
                ValidationError::ZeroInterval,
                ValidationError::EmptyMount,
                ValidationError::DuplicateMount("/a".into()),
                ValidationError::UnknownLogLevel("loud".into()),
                ValidationError::InvalidMetricsAddress("nowhere".into()),
            ]
        );
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = GuardConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }
}
