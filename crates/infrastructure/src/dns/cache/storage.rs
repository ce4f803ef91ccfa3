use super::key::CacheKey;
use super::metrics::{CacheMetrics, CacheMetricsSnapshot};
use dashmap::DashMap;
use iterdns_application::ports::ResponseCachePort;
use iterdns_domain::DnsQuery;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub bytes: Arc<[u8]>,
    pub inserted_at: Instant,
}

impl CacheEntry {
    #[inline]
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) <= ttl
    }
}

/// Raw responses valid for a fixed window after insertion.
///
/// Stale entries are never returned. They stay in the map until overwritten
/// by the next successful resolution for the same key or removed by
/// [`ResponseCache::purge_expired`].
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry, FxBuildHasher>,
    ttl: Duration,
    metrics: CacheMetrics,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        info!(ttl_secs = ttl.as_secs_f64(), "Initializing response cache");
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            ttl,
            metrics: CacheMetrics::default(),
        }
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<[u8]>> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl, now) => {
                self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
                Some(Arc::clone(&entry.bytes))
            }
            Some(_) => {
                self.metrics.stale_bypasses.fetch_add(1, AtomicOrdering::Relaxed);
                self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
                None
            }
            None => {
                self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
                None
            }
        }
    }

    /// Stores `bytes` under `key` stamped with the current time. Last write wins.
    pub fn put(&self, key: CacheKey, bytes: Arc<[u8]>) {
        self.entries.insert(
            key,
            CacheEntry {
                bytes,
                inserted_at: Instant::now(),
            },
        );
        self.metrics.insertions.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Drops every entry older than the TTL window and returns how many went.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.is_fresh(self.ttl, now));
        let removed = before.saturating_sub(self.entries.len());

        if removed > 0 {
            self.metrics
                .purged
                .fetch_add(removed as u64, AtomicOrdering::Relaxed);
            debug!(removed = removed, remaining = self.entries.len(), "Purged stale cache entries");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metrics(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.entries.len())
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCachePort for ResponseCache {
    fn get(&self, query: &DnsQuery) -> Option<Arc<[u8]>> {
        ResponseCache::get(self, &CacheKey::from_query(query))
    }

    fn put(&self, query: &DnsQuery, bytes: Arc<[u8]>) {
        ResponseCache::put(self, CacheKey::from_query(query), bytes)
    }
}
