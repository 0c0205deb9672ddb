//! Periodic mount collection.
//!
//! # Responsibilities
//! - Probe every configured mount once per cycle
//! - Turn guarded results into reports for the output layer
//!
//! # Design Decisions
//! - One task per mount, so a stuck mount never delays the others
//! - No retries here; the next cycle is the retry
//! - Reports keep configuration order regardless of completion order

pub mod report;

pub use report::{MountReport, MountStatus};

use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};

use crate::config::CollectorConfig;
use crate::guard::{Probe, Prober};

/// Drives guarded probes over a fixed set of mounts.
pub struct MountCollector<P: Probe> {
    prober: Prober<P>,
    config: CollectorConfig,
}

impl<P: Probe> MountCollector<P> {
    pub fn new(prober: Prober<P>, config: CollectorConfig) -> Self {
        Self { prober, config }
    }

    /// Run one collection cycle and return a report per mount.
    pub async fn collect_once(&self) -> Vec<MountReport<P::Stats>> {
        let mut tasks = JoinSet::new();

        for (index, path) in self.config.mounts.iter().cloned().enumerate() {
            let prober = self.prober.clone();
            tasks.spawn(async move {
                let result = prober.run(&path).await;
                (index, MountReport::from_result(path, result))
            });
        }

        let mut reports = Vec::with_capacity(self.config.mounts.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(entry) => reports.push(entry),
                Err(e) => tracing::error!(error = %e, "Collection task failed"),
            }
        }

        reports.sort_by_key(|(index, _)| *index);
        reports.into_iter().map(|(_, report)| report).collect()
    }

    /// Collect on every tick until shutdown, sending reports to `reports`.
    pub async fn run(
        self,
        reports: mpsc::Sender<MountReport<P::Stats>>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let interval = self.config.interval().max(Duration::from_millis(1));

        tracing::info!(
            mounts = self.config.mounts.len(),
            interval_secs = self.config.interval_secs,
            timeout_ms = self.prober.timeout().as_millis() as u64,
            "Mount collector starting"
        );

        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    for report in self.collect_once().await {
                        if report.status != MountStatus::Ok {
                            tracing::debug!(
                                path = %report.path,
                                status = ?report.status,
                                "Mount not collected"
                            );
                        }
                        if reports.send(report).await.is_err() {
                            tracing::info!("Report receiver closed, stopping collector");
                            return;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Mount collector received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
