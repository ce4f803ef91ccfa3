mod dns_resolver;
mod response_cache;

pub use dns_resolver::{DnsResolution, DnsResolver, ResolutionOutcome};
pub use response_cache::ResponseCachePort;

// Re-export for convenience
pub use iterdns_domain::DnsQuery;
