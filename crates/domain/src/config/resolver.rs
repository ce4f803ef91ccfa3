use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// How the server obtains answers on a cache miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    /// Walk referrals starting at the seed server.
    #[default]
    Iterative,
    /// Forward the query to the seed server and trust it to recurse.
    Recursive,
}

impl fmt::Display for ResolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverMode::Iterative => f.write_str("iterative"),
            ResolverMode::Recursive => f.write_str("recursive"),
        }
    }
}

impl FromStr for ResolverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iterative" => Ok(ResolverMode::Iterative),
            "recursive" => Ok(ResolverMode::Recursive),
            _ => Err(format!("Unknown resolver mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub mode: ResolverMode,

    /// Root (iterative) or upstream (recursive) server, as `IP:PORT`.
    #[serde(default = "default_seed_server")]
    pub seed_server: String,

    #[serde(default = "default_hop_timeout_ms")]
    pub hop_timeout_ms: u64,

    #[serde(default = "default_stub_timeout_ms")]
    pub stub_timeout_ms: u64,

    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
}

impl ResolverConfig {
    pub fn seed_addr(&self) -> Result<SocketAddr, String> {
        self.seed_server
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid seed server '{}': {}", self.seed_server, e))
    }

    pub fn hop_timeout(&self) -> Duration {
        Duration::from_millis(self.hop_timeout_ms)
    }

    pub fn stub_timeout(&self) -> Duration {
        Duration::from_millis(self.stub_timeout_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            mode: ResolverMode::default(),
            seed_server: default_seed_server(),
            hop_timeout_ms: default_hop_timeout_ms(),
            stub_timeout_ms: default_stub_timeout_ms(),
            max_hops: default_max_hops(),
        }
    }
}

// a.root-servers.net
fn default_seed_server() -> String {
    "198.41.0.4:53".to_string()
}

fn default_hop_timeout_ms() -> u64 {
    2000
}

fn default_stub_timeout_ms() -> u64 {
    5000
}

fn default_max_hops() -> usize {
    20
}
