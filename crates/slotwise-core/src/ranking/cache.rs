//! Per-client cache of derived signals.
//!
//! Keys hash the memo text and the appointments inside the history window, so
//! an edited memo, a new appointment or one ageing out of the window produces a
//! fresh key. Each client holds at most one entry: a fresh key replaces the
//! client's previous one. Each key is computed at most once even when many
//! threads ask for it at the same time.

use chrono::{DateTime, FixedOffset};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use super::ClientSignals;

/// Cache key: `(client_id, memo hash, windowed history hash)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub client_id: String,
    pub memo_hash: String,
    pub history_hash: String,
}

impl CacheKey {
    /// `in_window` must already be restricted to the analysis window.
    pub fn new(
        client_id: &str,
        memo: &str,
        in_window: &[DateTime<FixedOffset>],
        window_weeks: u32,
    ) -> Self {
        let memo_hash = hex::encode(Sha256::digest(memo.as_bytes()));

        let mut hasher = Sha256::new();
        hasher.update(window_weeks.to_be_bytes());
        for start in in_window {
            hasher.update(start.to_rfc3339().as_bytes());
            hasher.update(b"\n");
        }
        let history_hash = hex::encode(hasher.finalize());

        Self {
            client_id: client_id.to_string(),
            memo_hash,
            history_hash,
        }
    }
}

type SignalCell = Arc<OnceLock<Arc<ClientSignals>>>;

#[derive(Debug)]
struct Entry {
    key: CacheKey,
    cell: SignalCell,
}

/// Thread-safe cache of parsed predicates and behavioral profiles.
#[derive(Debug, Default)]
pub struct SignalCache {
    entries: Mutex<HashMap<String, Entry>>,
    computations: AtomicU64,
}

impl SignalCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // Entries are inserted or removed whole, so a poisoned map is still usable.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the cached signals for `key`, computing them once if absent.
    ///
    /// A key that differs from the client's current one evicts it. The map
    /// lock is released before `compute` runs; concurrent callers for the same
    /// key block on that key's cell only.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> Arc<ClientSignals>
    where
        F: FnOnce() -> ClientSignals,
    {
        let cell = {
            let mut entries = self.entries();
            let current = entries
                .get(&key.client_id)
                .map(|entry| (entry.key == key, Arc::clone(&entry.cell)));
            match current {
                Some((true, cell)) => cell,
                stale => {
                    if stale.is_some() {
                        tracing::debug!(client_id = %key.client_id, "replacing stale cached signals");
                    }
                    let cell = SignalCell::default();
                    entries.insert(
                        key.client_id.clone(),
                        Entry {
                            key,
                            cell: Arc::clone(&cell),
                        },
                    );
                    cell
                }
            }
        };
        Arc::clone(cell.get_or_init(|| {
            self.computations.fetch_add(1, Ordering::Relaxed);
            Arc::new(compute())
        }))
    }

    /// Drop the entry belonging to `client_id`, returning how many were removed.
    pub fn invalidate(&self, client_id: &str) -> usize {
        let removed = usize::from(self.entries().remove(client_id).is_some());
        tracing::debug!(client_id, removed, "invalidated cached signals");
        removed
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of clients with a cached entry.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of times a value was actually computed.
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }
}
