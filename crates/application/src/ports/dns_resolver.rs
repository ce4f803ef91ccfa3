use async_trait::async_trait;
use iterdns_domain::{DnsQuery, DomainError, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;

/// Terminal state of a successful resolution.
///
/// A name error is a definitive negative answer, not a failure: it is relayed
/// to the client verbatim and may be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Answered,
    NameError,
}

impl ResolutionOutcome {
    /// Classifies raw response bytes by their RCODE.
    pub fn from_response(bytes: &[u8]) -> Self {
        match bytes.get(3).map(|b| ResponseCode::from_u8(b & 0x0F)) {
            Some(ResponseCode::NXDomain) => ResolutionOutcome::NameError,
            _ => ResolutionOutcome::Answered,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOutcome::Answered => "ANSWERED",
            ResolutionOutcome::NameError => "NXDOMAIN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DnsResolution {
    /// The raw response exactly as received from the final server.
    pub bytes: Arc<[u8]>,
    pub outcome: ResolutionOutcome,
    pub cache_hit: bool,
    /// Server that produced the final response (absent for cache hits).
    pub upstream_server: Option<SocketAddr>,
    /// Number of queries sent to produce this response.
    pub hops: usize,
}

impl DnsResolution {
    pub fn new(bytes: impl Into<Arc<[u8]>>, outcome: ResolutionOutcome) -> Self {
        Self {
            bytes: bytes.into(),
            outcome,
            cache_hit: false,
            upstream_server: None,
            hops: 0,
        }
    }

    pub fn from_cache(bytes: Arc<[u8]>) -> Self {
        let outcome = ResolutionOutcome::from_response(&bytes);
        Self {
            bytes,
            outcome,
            cache_hit: true,
            upstream_server: None,
            hops: 0,
        }
    }

    pub fn with_upstream(mut self, server: SocketAddr, hops: usize) -> Self {
        self.upstream_server = Some(server);
        self.hops = hops;
        self
    }
}

#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolve `query` to a raw response.
    ///
    /// Returns `Ok` for both an answer and a name error; every other terminal
    /// state is an `Err`.
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError>;

    fn name(&self) -> &'static str;
}
