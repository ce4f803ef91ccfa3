pub mod key;
pub mod metrics;
pub mod storage;

pub use key::CacheKey;
pub use metrics::{CacheMetrics, CacheMetricsSnapshot};
pub use storage::{CacheEntry, ResponseCache, DEFAULT_TTL};
