//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mount_guard_probes_total` (counter): guarded calls by outcome
//! - `mount_guard_timeouts_total` (counter): timeout events, including ones after the caller left
//! - `mount_guard_stuck_mounts` (gauge): mounts currently marked stuck
//! - `mount_guard_probe_duration_seconds` (histogram): time until a probe resolved
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one guarded call by its caller-visible outcome.
pub fn record_probe_result(outcome: &'static str) {
    counter!("mount_guard_probes_total", "outcome" => outcome).increment(1);
}

/// Count one timeout event.
pub fn record_timeout() {
    counter!("mount_guard_timeouts_total").increment(1);
}

/// Update the number of mounts currently stuck.
pub fn set_stuck_mounts(count: usize) {
    gauge!("mount_guard_stuck_mounts").set(count as f64);
}

/// Record how long a probe took to resolve.
pub fn record_probe_duration(elapsed: Duration) {
    histogram!("mount_guard_probe_duration_seconds").record(elapsed.as_secs_f64());
}
