//! Timeout-guarded probe invocation.
//!
//! # Responsibilities
//! - Fail fast for mounts already known to be stuck
//! - Run the blocking probe on its own worker thread
//! - Race the worker against a recurring timeout and relay the first event
//! - Keep the registry accurate after the caller has moved on
//!
//! # Lifetimes
//! ```text
//! run(path) ──spawn──▶ worker thread ──outcome──▶ wait loop ──first event──▶ run(path) returns
//!                                                     │
//!                                                     └── keeps racing after a timeout until
//!                                                         the worker resolves, then clears the
//!                                                         registry and exits
//! ```
//!
//! The wait loop is a detached task that may outlive the `run` call that
//! spawned it. After the first relayed event it only talks to the registry.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::time;

use crate::config::ProberConfig;
use crate::guard::registry::StuckRegistry;
use crate::guard::types::{GuardError, GuardResult, ProbeError, ProbeOutcome};
use crate::observability::metrics;

/// A blocking filesystem probe with unknown latency.
///
/// Plain `fn` items and closures implement this through the blanket impl.
/// A `Prober` whose future is handed to `tokio::spawn` needs a named probe
/// type (a `fn` item or a struct): rustc cannot prove the higher-ranked
/// `Fn(&str)` bound for an anonymous closure inside a spawned future.
pub trait Probe: Send + Sync + 'static {
    /// Successful probe payload.
    type Stats: Send + 'static;

    /// Probe `path`. May block for an unbounded amount of time.
    fn probe(&self, path: &str) -> Result<Self::Stats, ProbeError>;
}

impl<F, S> Probe for F
where
    F: Fn(&str) -> Result<S, ProbeError> + Send + Sync + 'static,
    S: Send + 'static,
{
    type Stats = S;

    fn probe(&self, path: &str) -> Result<S, ProbeError> {
        self(path)
    }
}

/// Interval used when a zero timeout is requested.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Runs a [`Probe`] with a bounded wait for the caller.
pub struct Prober<P: Probe> {
    probe: Arc<P>,
    registry: Arc<StuckRegistry>,
    timeout: Duration,
}

impl<P: Probe> Clone for Prober<P> {
    fn clone(&self) -> Self {
        Self {
            probe: self.probe.clone(),
            registry: self.registry.clone(),
            timeout: self.timeout,
        }
    }
}

impl<P: Probe> Prober<P> {
    /// Create a prober backed by the process-wide registry.
    pub fn new(probe: P, timeout: Duration) -> Self {
        Self::with_registry(probe, timeout, StuckRegistry::global())
    }

    /// Create a prober backed by an explicit registry.
    ///
    /// A zero `timeout` would report a timeout on every scheduler tick, so it
    /// is replaced by [`DEFAULT_TIMEOUT`].
    pub fn with_registry(probe: P, timeout: Duration, registry: Arc<StuckRegistry>) -> Self {
        let timeout = if timeout.is_zero() {
            tracing::warn!(
                default_ms = DEFAULT_TIMEOUT.as_millis() as u64,
                "Zero probe timeout requested, using default"
            );
            DEFAULT_TIMEOUT
        } else {
            timeout
        };

        Self {
            probe: Arc::new(probe),
            registry,
            timeout,
        }
    }

    /// Create a prober from configuration.
    pub fn from_config(probe: P, config: &ProberConfig, registry: Arc<StuckRegistry>) -> Self {
        Self::with_registry(probe, config.timeout(), registry)
    }

    /// The registry this prober reads and updates.
    pub fn registry(&self) -> &Arc<StuckRegistry> {
        &self.registry
    }

    /// Interval after which a pending probe is reported as timed out.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe `path`, waiting at most one timeout interval for an answer.
    ///
    /// Returns the first event of the race: the probe's stats, the probe's
    /// error, or [`GuardError::Timeout`]. A path that is already stuck
    /// returns [`GuardError::Unavailable`] without probing.
    pub async fn run(&self, path: &str) -> GuardResult<P::Stats> {
        if self.registry.is_stuck(path) {
            tracing::debug!(path = %path, "Mount marked stuck, skipping probe");
            metrics::record_probe_result("unavailable");
            return Err(GuardError::Unavailable {
                path: path.to_owned(),
            });
        }

        let outcome_rx = match self.launch_worker(path) {
            Ok(rx) => rx,
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Could not start probe worker");
                metrics::record_probe_result(e.kind());
                return Err(e);
            }
        };

        let (relay_tx, relay_rx) = oneshot::channel();
        tokio::spawn(wait_loop(
            path.to_owned(),
            outcome_rx,
            relay_tx,
            self.registry.clone(),
            self.timeout,
        ));

        let result = relay_rx.await.unwrap_or_else(|_| {
            Err(GuardError::WorkerLost {
                path: path.to_owned(),
            })
        });

        metrics::record_probe_result(match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        });
        result
    }

    fn launch_worker(&self, path: &str) -> GuardResult<oneshot::Receiver<ProbeOutcome<P::Stats>>> {
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let probe = self.probe.clone();
        let finalizer = ClearOnDrop {
            registry: self.registry.clone(),
            path: path.to_owned(),
        };

        thread::Builder::new()
            .name("mount-probe".to_string())
            .spawn(move || {
                let outcome = ProbeOutcome::from(probe.probe(&finalizer.path));
                let _ = outcome_tx.send(outcome);
                drop(finalizer);
            })
            .map_err(|source| GuardError::Spawn {
                path: path.to_owned(),
                source,
            })?;

        Ok(outcome_rx)
    }
}

/// Clears the registry entry when the worker finishes, including by panic.
struct ClearOnDrop {
    registry: Arc<StuckRegistry>,
    path: String,
}

impl Drop for ClearOnDrop {
    fn drop(&mut self) {
        self.registry.clear(&self.path);
    }
}

async fn wait_loop<S: Send + 'static>(
    path: String,
    mut outcome_rx: oneshot::Receiver<ProbeOutcome<S>>,
    relay_tx: oneshot::Sender<GuardResult<S>>,
    registry: Arc<StuckRegistry>,
    interval: Duration,
) {
    let started = Instant::now();
    let mut relay = Some(relay_tx);
    let mut timeouts = 0u64;

    loop {
        tokio::select! {
            biased;

            received = &mut outcome_rx => {
                registry.clear(&path);
                metrics::set_stuck_mounts(registry.stuck_count());
                metrics::record_probe_duration(started.elapsed());

                let result = match received {
                    Ok(ProbeOutcome::Completed(stats)) => Ok(stats),
                    Ok(ProbeOutcome::Failed(source)) => Err(GuardError::ProbeFailed {
                        path: path.clone(),
                        source,
                    }),
                    Err(_) => Err(GuardError::WorkerLost { path: path.clone() }),
                };

                if timeouts > 0 {
                    tracing::info!(
                        path = %path,
                        timeouts,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Stuck mount resolved"
                    );
                }
                if let Err(e) = &result {
                    tracing::debug!(path = %path, error = %e, "Probe finished with error");
                }

                deliver(&mut relay, result);
                return;
            }
            _ = time::sleep(interval) => {
                timeouts += 1;
                let count = registry.record_timeout(&path);
                metrics::record_timeout();
                metrics::set_stuck_mounts(registry.stuck_count());

                tracing::warn!(
                    path = %path,
                    count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Probe timed out, mount marked stuck"
                );

                deliver(&mut relay, Err(GuardError::Timeout { path: path.clone() }));
            }
        }
    }
}

/// Relay `event` to the caller if nothing has been relayed yet.
fn deliver<S>(relay: &mut Option<oneshot::Sender<GuardResult<S>>>, event: GuardResult<S>) {
    if let Some(tx) = relay.take() {
        // The caller may have dropped its future; the registry is still updated.
        let _ = tx.send(event);
    }
}
