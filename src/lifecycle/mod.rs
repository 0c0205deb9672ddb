//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → wait_for_signal returns
//!
//! Shutdown (shutdown.rs):
//!     trigger() → collector loop exits → pending reports flushed → exit
//! ```
//!
//! # Design Decisions
//! - Worker threads stuck in a probe are not joined; exiting the process ends them

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
