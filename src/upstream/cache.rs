//! Host cache for discovered assistant base URLs.
//!
//! The resolver talks to the cache through the `HostStore` and `Clock`
//! traits so tests can inject a scripted store and a fake clock. Production
//! uses a concurrent map shared by all in-flight requests; concurrent writes
//! for the same assistant are last-write-wins, which is fine because every
//! write is a re-derivation of the same upstream fact.

use std::time::Instant;

use dashmap::DashMap;

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A cached, normalized base URL for one assistant.
#[derive(Debug, Clone)]
pub struct HostEntry {
    /// Normalized base URL (e.g. "https://host.example/assistant").
    pub base_url: String,
    /// Entry is usable only while `now < expires_at`.
    pub expires_at: Instant,
}

impl HostEntry {
    /// True while the entry has not passed its expiry.
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Storage seam for the host cache.
pub trait HostStore: Send + Sync {
    /// Look up the entry for an assistant, expired or not.
    fn get(&self, assistant: &str) -> Option<HostEntry>;

    /// Insert or overwrite the entry for an assistant.
    fn put(&self, assistant: &str, entry: HostEntry);
}

/// In-memory host store. Entries are never evicted; the set of assistant
/// names is small and bounded by the deployment.
#[derive(Default)]
pub struct MemoryHostStore {
    entries: DashMap<String, HostEntry>,
}

impl MemoryHostStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of assistants tracked (fresh or expired).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no assistant has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HostStore for MemoryHostStore {
    fn get(&self, assistant: &str) -> Option<HostEntry> {
        self.entries.get(assistant).map(|r| r.value().clone())
    }

    fn put(&self, assistant: &str, entry: HostEntry) {
        self.entries.insert(assistant.to_string(), entry);
    }
}
