//! The live set of names that currently resolve to local containers.
//!
//! Single writer (the refresh job), arbitrarily many concurrent
//! readers (in-flight queries). Snapshots are replaced wholesale via
//! `ArcSwap`, so a reader always observes one consistent past
//! snapshot and `replace` costs readers no more than a pointer swap.
//! There is deliberately no insert/remove API: partial updates cannot
//! express container removal correctly.

use arc_swap::ArcSwap;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct HostnameCache {
    names: ArcSwap<HashSet<String>>,
}

impl HostnameCache {
    /// Create an empty cache. It stays empty until the first rebuild
    /// installs a snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically install a complete new snapshot.
    pub fn replace(&self, names: HashSet<String>) {
        self.names.store(Arc::new(names));
    }

    /// Non-blocking membership test against the current snapshot.
    pub fn contains(&self, name: &str) -> bool {
        self.names.load().contains(name)
    }

    /// The current snapshot, shared. Used for logging and tests.
    pub fn snapshot(&self) -> Arc<HashSet<String>> {
        self.names.load_full()
    }

    pub fn len(&self) -> usize {
        self.names.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.load().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn starts_empty() {
        let cache = HostnameCache::new();
        assert!(cache.is_empty());
        assert!(!cache.contains("web"));
    }

    #[test]
    fn replace_installs_whole_snapshot() {
        let cache = HostnameCache::new();
        cache.replace(set_of(&["web", "db"]));
        assert!(cache.contains("web"));
        assert!(cache.contains("db"));

        cache.replace(set_of(&["api"]));
        assert!(cache.contains("api"));
        // Removal is expressed by absence from the new snapshot.
        assert!(!cache.contains("web"));
    }

    #[test]
    fn replace_is_idempotent() {
        let cache = HostnameCache::new();
        cache.replace(set_of(&["web"]));
        let before = cache.contains("web");
        cache.replace(set_of(&["web"]));
        assert_eq!(before, cache.contains("web"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn readers_never_observe_a_mixed_snapshot() {
        let cache = Arc::new(HostnameCache::new());
        cache.replace(set_of(&["old"]));

        let writer = {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for _ in 0..1_000 {
                    cache.replace(set_of(&["old"]));
                    cache.replace(set_of(&["new"]));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        let snapshot = cache.snapshot();
                        let observation =
                            (snapshot.contains("old"), snapshot.contains("new"));
                        // Every observation is exactly one of the two
                        // snapshots, never a mix and never empty.
                        assert!(
                            observation == (true, false) || observation == (false, true),
                            "torn snapshot observed: {observation:?}"
                        );
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
