use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Age after which a cached response is no longer served.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// How often stale entries are swept out of memory. 0 disables the sweep.
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn purge_interval(&self) -> Option<Duration> {
        (self.purge_interval_secs > 0).then(|| Duration::from_secs(self.purge_interval_secs))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    10
}

fn default_purge_interval_secs() -> u64 {
    60
}
