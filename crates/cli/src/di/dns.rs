use iterdns_application::ports::DnsResolver;
use iterdns_application::use_cases::HandleDnsQueryUseCase;
use iterdns_domain::config::ResolverConfig;
use iterdns_domain::{Config, ResolverMode};
use iterdns_infrastructure::dns::{
    DnsServerHandler, IterativeResolver, ResponseCache, StubResolver, UdpTransport,
};
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub cache: Arc<ResponseCache>,
    pub handler: DnsServerHandler,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let resolver = build_resolver(&config.resolver, config.resolver.mode)?;
        let cache = Arc::new(ResponseCache::new(config.cache.ttl()));

        let use_case = Arc::new(HandleDnsQueryUseCase::new(resolver, cache.clone()));
        info!(
            resolver = use_case.resolver_name(),
            cache_ttl_secs = config.cache.ttl_secs,
            "DNS services initialized"
        );

        Ok(Self {
            cache,
            handler: DnsServerHandler::new(use_case),
        })
    }
}

pub fn build_resolver(
    config: &ResolverConfig,
    mode: ResolverMode,
) -> anyhow::Result<Arc<dyn DnsResolver>> {
    let seed = config.seed_addr().map_err(anyhow::Error::msg)?;
    let transport = Arc::new(UdpTransport::new());

    let resolver: Arc<dyn DnsResolver> = match mode {
        ResolverMode::Iterative => Arc::new(
            IterativeResolver::new(transport, seed)
                .with_hop_timeout(config.hop_timeout())
                .with_max_hops(config.max_hops),
        ),
        ResolverMode::Recursive => Arc::new(
            StubResolver::new(transport, seed).with_timeout(config.stub_timeout()),
        ),
    };

    info!(mode = %mode, seed = %seed, "Resolver configured");
    Ok(resolver)
}
