use crate::ports::{DnsResolution, DnsResolver, ResponseCachePort};
use iterdns_domain::{DnsRequest, DomainError};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Cache lookup, resolution on miss, and storing of the result.
pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn DnsResolver>,
    cache: Arc<dyn ResponseCachePort>,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>, cache: Arc<dyn ResponseCachePort>) -> Self {
        Self { resolver, cache }
    }

    pub fn resolver_name(&self) -> &'static str {
        self.resolver.name()
    }

    /// Answers `request` from the cache or the resolver.
    ///
    /// Both answers and name errors are stored. Failures are returned as-is
    /// and never populate the cache.
    pub async fn execute(&self, request: &DnsRequest) -> Result<DnsResolution, DomainError> {
        let start = Instant::now();

        if let Some(bytes) = self.cache.get(&request.query) {
            debug!(
                domain = %request.domain(),
                record_type = %request.record_type(),
                "Cache hit"
            );
            return Ok(DnsResolution::from_cache(bytes));
        }

        let resolution = self.resolver.resolve(&request.query).await?;
        self.cache
            .put(&request.query, Arc::clone(&resolution.bytes));

        debug!(
            domain = %request.domain(),
            record_type = %request.record_type(),
            outcome = resolution.outcome.as_str(),
            hops = resolution.hops,
            elapsed_ms = start.elapsed().as_millis() as u64,
            resolver = self.resolver.name(),
            "Resolved"
        );

        Ok(resolution)
    }
}
