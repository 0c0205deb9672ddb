//! Mount guard: timeout-guarded filesystem probing.
//!
//! Keeps a monitoring loop from blocking on hung mounts. Each probe runs on
//! its own worker, the caller waits at most one timeout interval, and mounts
//! that timed out are remembered so later probes fail fast until the
//! outstanding worker resolves.

pub mod collector;
pub mod config;
pub mod guard;
pub mod lifecycle;
pub mod observability;
pub mod probe;

pub use config::GuardConfig;
pub use guard::{GuardError, Probe, Prober, StuckRegistry};
pub use lifecycle::Shutdown;
