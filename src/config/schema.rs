//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! default every field, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the mount guard.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Guarded probe settings.
    pub prober: ProberConfig,

    /// Collection cycle settings.
    pub collector: CollectorConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Guarded probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProberConfig {
    /// Interval after which a pending probe is reported as timed out, in milliseconds.
    pub timeout_ms: u64,

    /// Expected number of distinct mounts, used to pre-size the stuck registry.
    pub expected_calls: usize,
}

impl ProberConfig {
    /// Timeout interval as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            expected_calls: 16,
        }
    }
}

/// Collection cycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Mount paths to probe on every cycle.
    pub mounts: Vec<String>,

    /// Seconds between collection cycles.
    pub interval_secs: u64,
}

impl CollectorConfig {
    /// Cycle interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            mounts: vec!["/".to_string()],
            interval_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9108".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GuardConfig::default();
        assert_eq!(config.prober.timeout(), Duration::from_secs(1));
        assert_eq!(config.collector.interval(), Duration::from_secs(60));
        assert_eq!(config.collector.mounts, vec!["/"]);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GuardConfig = toml::from_str(
            r#"
            [prober]
            timeout_ms = 250

            [collector]
            mounts = ["/mnt/nfs", "/home"]
            "#,
        )
        .unwrap();

        assert_eq!(config.prober.timeout(), Duration::from_millis(250));
        assert_eq!(config.prober.expected_calls, 16);
        assert_eq!(config.collector.mounts, vec!["/mnt/nfs", "/home"]);
        assert_eq!(config.collector.interval_secs, 60);
        assert_eq!(config.observability.log_level, "info");
    }
}
