//! Probe outcome and error definitions.

use thiserror::Error;

/// Error reported by a probe implementation.
pub type ProbeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single result a worker produces for one probe invocation.
#[derive(Debug)]
pub enum ProbeOutcome<S> {
    /// The probe returned statistics.
    Completed(S),
    /// The probe returned a definite error.
    Failed(ProbeError),
}

impl<S> From<Result<S, ProbeError>> for ProbeOutcome<S> {
    fn from(result: Result<S, ProbeError>) -> Self {
        match result {
            Ok(stats) => ProbeOutcome::Completed(stats),
            Err(err) => ProbeOutcome::Failed(err),
        }
    }
}

/// Errors returned by a guarded probe call.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The path is already known to be stuck; no probe was attempted.
    #[error("mount '{path}' is unavailable")]
    Unavailable { path: String },

    /// The probe did not conclude within one timeout interval.
    #[error("operation on mount '{path}' timed out")]
    Timeout { path: String },

    /// The probe itself returned an error.
    #[error("{source}")]
    ProbeFailed {
        path: String,
        #[source]
        source: ProbeError,
    },

    /// The worker ended without delivering an outcome.
    #[error("probe worker for mount '{path}' exited without a result")]
    WorkerLost { path: String },

    /// The worker thread could not be started.
    #[error("failed to start probe worker for mount '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl GuardError {
    /// Short stable label, used for metrics and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            GuardError::Unavailable { .. } => "unavailable",
            GuardError::Timeout { .. } => "timeout",
            GuardError::ProbeFailed { .. } => "error",
            GuardError::WorkerLost { .. } => "worker_lost",
            GuardError::Spawn { .. } => "spawn_failed",
        }
    }
}

/// Result type for guarded probe calls.
pub type GuardResult<T> = Result<T, GuardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GuardError::Unavailable { path: "/mnt/y".into() };
        assert_eq!(err.to_string(), "mount '/mnt/y' is unavailable");

        let err = GuardError::Timeout { path: "/mnt/y".into() };
        assert_eq!(err.to_string(), "operation on mount '/mnt/y' timed out");
    }

    #[test]
    fn test_probe_failure_keeps_cause_message() {
        let err = GuardError::ProbeFailed {
            path: "/mnt/z".into(),
            source: "disk full".into(),
        };
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(err.kind(), "error");
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: Result<u32, ProbeError> = Ok(7);
        assert!(matches!(ProbeOutcome::from(ok), ProbeOutcome::Completed(7)));

        let failed: Result<u32, ProbeError> = Err("boom".into());
        match ProbeOutcome::from(failed) {
            ProbeOutcome::Failed(err) => assert_eq!(err.to_string(), "boom"),
            ProbeOutcome::Completed(_) => panic!("expected failure"),
        }
    }
}
