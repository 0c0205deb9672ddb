//! Stuck-mount registry.
//!
//! # Responsibilities
//! - Track consecutive timeouts per mount path
//! - Answer "is this path currently unreliable" in O(1)
//!
//! # Design Decisions
//! - One lock over the whole table; operations are tiny compared to probe latency
//! - Entries are created lazily and never removed
//! - A poisoned lock is recovered, the table only holds counters

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

static GLOBAL: OnceLock<Arc<StuckRegistry>> = OnceLock::new();

/// Shared table of `mount path → consecutive timeout count`.
///
/// A path is stuck while its count is greater than zero.
#[derive(Debug, Default)]
pub struct StuckRegistry {
    counts: Mutex<HashMap<String, u64>>,
}

impl StuckRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry pre-sized for `capacity` mount paths.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: Mutex::new(HashMap::with_capacity(capacity)),
        }
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> Arc<StuckRegistry> {
        GLOBAL.get_or_init(|| Arc::new(StuckRegistry::new())).clone()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return true if a probe on `path` timed out and has not resolved since.
    pub fn is_stuck(&self, path: &str) -> bool {
        self.count(path) > 0
    }

    /// Record one more timeout for `path` and return the new count.
    pub fn record_timeout(&self, path: &str) -> u64 {
        let mut table = self.table();
        let count = table.entry(path.to_owned()).or_insert(0);
        *count += 1;
        *count
    }

    /// Reset the timeout count for `path` after a conclusive outcome.
    pub fn clear(&self, path: &str) {
        let mut table = self.table();
        if let Some(count) = table.get_mut(path) {
            *count = 0;
        } else {
            table.insert(path.to_owned(), 0);
        }
    }

    /// Current consecutive timeout count for `path` (zero if never seen).
    pub fn count(&self, path: &str) -> u64 {
        self.table().get(path).copied().unwrap_or(0)
    }

    /// Number of paths currently stuck.
    pub fn stuck_count(&self) -> usize {
        self.table().values().filter(|count| **count > 0).count()
    }

    /// Sorted snapshot of the paths currently stuck.
    pub fn stuck_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .table()
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_unknown_path_is_not_stuck() {
        let registry = StuckRegistry::new();
        assert!(!registry.is_stuck("/mnt/a"));
        assert_eq!(registry.count("/mnt/a"), 0);
    }

    #[test]
    fn test_timeouts_accumulate_until_cleared() {
        let registry = StuckRegistry::new();

        assert_eq!(registry.record_timeout("/mnt/a"), 1);
        assert_eq!(registry.record_timeout("/mnt/a"), 2);
        assert!(registry.is_stuck("/mnt/a"));

        registry.clear("/mnt/a");
        assert!(!registry.is_stuck("/mnt/a"));
        assert_eq!(registry.count("/mnt/a"), 0);

        // Counting starts over after a resolution
        assert_eq!(registry.record_timeout("/mnt/a"), 1);
    }

    #[test]
    fn test_paths_are_independent() {
        let registry = StuckRegistry::new();
        registry.record_timeout("/mnt/a");

        assert!(registry.is_stuck("/mnt/a"));
        assert!(!registry.is_stuck("/mnt/b"));

        registry.clear("/mnt/b");
        assert!(registry.is_stuck("/mnt/a"));
    }

    #[test]
    fn test_stuck_snapshot() {
        let registry = StuckRegistry::with_capacity(4);
        registry.record_timeout("/mnt/c");
        registry.record_timeout("/mnt/a");
        registry.record_timeout("/mnt/b");
        registry.clear("/mnt/b");

        assert_eq!(registry.stuck_count(), 2);
        assert_eq!(registry.stuck_paths(), vec!["/mnt/a", "/mnt/c"]);
    }

    #[test]
    fn test_concurrent_timeouts_are_not_lost() {
        let registry = Arc::new(StuckRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        registry.record_timeout("/mnt/shared");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.count("/mnt/shared"), 800);
    }

    #[test]
    fn test_global_is_shared() {
        let a = StuckRegistry::global();
        let b = StuckRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
