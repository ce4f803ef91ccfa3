use iterdns_domain::DnsQuery;
use std::sync::Arc;

/// Short-lived store of raw responses keyed by (name, type, class).
///
/// Implementations are shared by every in-flight request and must be safe
/// for concurrent use without any locking by the caller.
pub trait ResponseCachePort: Send + Sync {
    /// The stored response, unless absent or older than the freshness window.
    fn get(&self, query: &DnsQuery) -> Option<Arc<[u8]>>;

    /// Stores `bytes` for `query`, replacing any previous entry.
    fn put(&self, query: &DnsQuery, bytes: Arc<[u8]>);
}
