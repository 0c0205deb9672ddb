//! Shared probes and helpers for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mount_guard::guard::{Probe, ProbeError};
use mount_guard::StuckRegistry;

/// Stand-in for filesystem statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub path: String,
    pub free: u64,
}

/// A probe that blocks until the test releases it.
///
/// Dropping the [`Gate`] releases every pending call with an error, so no
/// worker thread outlives the test that created it.
pub struct GatedProbe {
    calls: Arc<AtomicUsize>,
    gate: Mutex<mpsc::Receiver<Result<u64, String>>>,
}

/// Test-side handle of a [`GatedProbe`].
pub struct Gate {
    calls: Arc<AtomicUsize>,
    release: mpsc::Sender<Result<u64, String>>,
}

pub fn gated_probe() -> (GatedProbe, Gate) {
    let calls = Arc::new(AtomicUsize::new(0));
    let (release, gate) = mpsc::channel();
    (
        GatedProbe {
            calls: calls.clone(),
            gate: Mutex::new(gate),
        },
        Gate { calls, release },
    )
}

impl Probe for GatedProbe {
    type Stats = Stats;

    fn probe(&self, path: &str) -> Result<Stats, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.gate.lock().unwrap().recv();
        match next {
            Ok(Ok(free)) => Ok(Stats {
                path: path.to_string(),
                free,
            }),
            Ok(Err(message)) => Err(message.into()),
            Err(_) => Err("gate dropped".into()),
        }
    }
}

#[allow(dead_code)]
impl Gate {
    pub fn succeed(&self, free: u64) {
        self.release.send(Ok(free)).unwrap();
    }

    pub fn fail(&self, message: &str) {
        self.release.send(Err(message.to_string())).unwrap();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Answers after a fixed delay.
#[allow(dead_code)]
pub struct DelayedProbe {
    pub delay: Duration,
    pub result: Result<u64, &'static str>,
}

#[allow(dead_code)]
pub fn delayed_probe(delay: Duration, result: Result<u64, &'static str>) -> DelayedProbe {
    DelayedProbe { delay, result }
}

impl Probe for DelayedProbe {
    type Stats = Stats;

    fn probe(&self, path: &str) -> Result<Stats, ProbeError> {
        std::thread::sleep(self.delay);
        match self.result {
            Ok(free) => Ok(Stats {
                path: path.to_string(),
                free,
            }),
            Err(message) => Err(message.into()),
        }
    }
}

/// Poll until `path` is no longer stuck or `deadline` passes.
#[allow(dead_code)]
pub async fn wait_until_cleared(registry: &StuckRegistry, path: &str, deadline: Duration) -> bool {
    let started = tokio::time::Instant::now();
    while started.elapsed() < deadline {
        if !registry.is_stuck(path) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    !registry.is_stuck(path)
}
