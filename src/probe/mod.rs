//! Filesystem statistics probe.
//!
//! A blocking `statvfs(2)` call. Against a hung network mount this may never
//! return, which is why it is only ever called through [`crate::guard::Prober`].

use nix::sys::statvfs::{statvfs, Statvfs};
use serde::{Deserialize, Serialize};

use crate::guard::ProbeError;

/// Space and inode usage of one mounted filesystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FsStats {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub pfree: f64,
    pub pused: f64,
    pub inodes_total: u64,
    pub inodes_free: u64,
    pub inodes_used: u64,
    pub inodes_pfree: f64,
    pub inodes_pused: f64,
}

impl FsStats {
    /// Build stats from raw block and inode counts.
    ///
    /// `blocks_free` includes blocks reserved for root; `blocks_available`
    /// is what unprivileged users can still allocate.
    pub fn from_counts(
        fragment_size: u64,
        blocks: u64,
        blocks_free: u64,
        blocks_available: u64,
        files: u64,
        files_free: u64,
    ) -> Self {
        let total = blocks.saturating_mul(fragment_size);
        let free = blocks_available.saturating_mul(fragment_size);
        let used = blocks.saturating_sub(blocks_free).saturating_mul(fragment_size);
        let (pused, pfree) = percentages(used, free);

        let inodes_used = files.saturating_sub(files_free);
        let (inodes_pused, inodes_pfree) = percentages(inodes_used, files_free);

        Self {
            total,
            free,
            used,
            pfree,
            pused,
            inodes_total: files,
            inodes_free: files_free,
            inodes_used,
            inodes_pfree,
            inodes_pused,
        }
    }
}

#[allow(clippy::unnecessary_cast)]
impl From<Statvfs> for FsStats {
    fn from(s: Statvfs) -> Self {
        Self::from_counts(
            s.fragment_size() as u64,
            s.blocks() as u64,
            s.blocks_free() as u64,
            s.blocks_available() as u64,
            s.files() as u64,
            s.files_free() as u64,
        )
    }
}

/// Percent used and percent free of `used + free`.
fn percentages(used: u64, free: u64) -> (f64, f64) {
    let capacity = used.saturating_add(free);
    if capacity == 0 {
        return (0.0, 100.0);
    }
    let pused = used as f64 * 100.0 / capacity as f64;
    (pused, 100.0 - pused)
}

/// Probe `path` with `statvfs(2)`.
pub fn statvfs_probe(path: &str) -> Result<FsStats, ProbeError> {
    let raw = statvfs(path)?;
    Ok(FsStats::from(raw))
}
