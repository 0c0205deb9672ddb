//! mount-guard
//!
//! Periodically collects filesystem statistics for a set of mounts without
//! ever letting a hung mount block the collection loop.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐ tick  ┌──────────────────┐  run(path)  ┌────────────────────┐
//!   │ MountCollector│──────▶│ task per mount   │────────────▶│ Prober             │
//!   └──────┬───────┘       └──────────────────┘             │  ├ StuckRegistry   │
//!          │ MountReport                                      │  ├ worker thread   │
//!          ▼                                                  │  └ wait loop       │
//!   JSON lines on stdout                                      └────────────────────┘
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;

use mount_guard::collector::{MountCollector, MountReport};
use mount_guard::config::{load_config, validate_config, ConfigError, GuardConfig};
use mount_guard::lifecycle::Shutdown;
use mount_guard::observability::{logging, metrics};
use mount_guard::probe::{statvfs_probe, FsStats};
use mount_guard::{Prober, StuckRegistry};

#[derive(Parser)]
#[command(name = "mount-guard")]
#[command(about = "Collect filesystem statistics without hanging on stuck mounts", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Probe timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Seconds between collection cycles.
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Run a single collection cycle and exit.
    #[arg(long)]
    once: bool,

    /// Mount points to probe (overrides the configured list).
    mounts: Vec<String>,
}

impl Cli {
    fn resolve_config(&self) -> Result<GuardConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GuardConfig::default(),
        };

        if let Some(timeout_ms) = self.timeout_ms {
            config.prober.timeout_ms = timeout_ms;
        }
        if let Some(interval_secs) = self.interval_secs {
            config.collector.interval_secs = interval_secs;
        }
        if !self.mounts.is_empty() {
            config.collector.mounts = self.mounts.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        mounts = config.collector.mounts.len(),
        timeout_ms = config.prober.timeout_ms,
        interval_secs = config.collector.interval_secs,
        "mount-guard v0.1.0 starting"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to start metrics endpoint"
            );
        }
    }

    let capacity = config.prober.expected_calls.max(config.collector.mounts.len());
    let registry = Arc::new(StuckRegistry::with_capacity(capacity));
    let prober = Prober::from_config(statvfs_probe, &config.prober, registry);
    let collector = MountCollector::new(prober, config.collector.clone());

    if cli.once {
        for report in collector.collect_once().await {
            print_report(&report)?;
        }
        return Ok(());
    }

    let shutdown = Shutdown::new();
    let (report_tx, mut report_rx) = mpsc::channel(config.collector.mounts.len().max(1) * 2);
    let collector_handle = tokio::spawn(collector.run(report_tx, shutdown.subscribe()));

    let signal_task = shutdown.listen_for_signals();

    while let Some(report) = report_rx.recv().await {
        print_report(&report)?;
    }

    signal_task.abort();
    if let Err(e) = collector_handle.await {
        tracing::error!(error = %e, "Collector task failed");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_report(report: &MountReport<FsStats>) -> Result<(), Box<dyn std::error::Error>> {
    let line = serde_json::to_string(report)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    Ok(())
}
