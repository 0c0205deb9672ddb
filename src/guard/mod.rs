//! Timeout-guarded probing subsystem.
//!
//! # Data Flow
//! ```text
//! Prober::run(path):
//!     → registry.rs (is the path stuck? → fail fast)
//!     → worker thread runs the blocking probe
//!     → detached wait loop races the worker against a recurring timer
//!         timer fired  → record_timeout, relay Timeout
//!         outcome      → clear, relay Stats / ProbeFailed, stop
//!     → caller receives the first relayed event
//! ```
//!
//! # Design Decisions
//! - The worker is never cancelled; a timeout only changes what the caller sees
//! - The wait loop outlives the call and corrects the registry once the truth is known
//! - Only the first event is relayed; later ones touch the registry alone

pub mod prober;
pub mod registry;
pub mod types;

pub use prober::{Probe, Prober};
pub use registry::StuckRegistry;
pub use types::{GuardError, GuardResult, ProbeError, ProbeOutcome};
