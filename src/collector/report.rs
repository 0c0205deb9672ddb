//! Per-mount collection reports.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::guard::{GuardError, GuardResult};

/// Caller-visible state of a mount after one guarded probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MountStatus {
    Ok,
    Unavailable,
    Timeout,
    Error,
}

impl From<&GuardError> for MountStatus {
    fn from(err: &GuardError) -> Self {
        match err {
            GuardError::Unavailable { .. } => MountStatus::Unavailable,
            GuardError::Timeout { .. } => MountStatus::Timeout,
            _ => MountStatus::Error,
        }
    }
}

/// Result of probing one mount in one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct MountReport<S> {
    pub path: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub status: MountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<S>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<S> MountReport<S> {
    pub fn from_result(path: String, result: GuardResult<S>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        match result {
            Ok(stats) => Self {
                path,
                timestamp,
                status: MountStatus::Ok,
                stats: Some(stats),
                error: None,
            },
            Err(e) => Self {
                path,
                timestamp,
                status: MountStatus::from(&e),
                stats: None,
                error: Some(e.to_string()),
            },
        }
    }
}
