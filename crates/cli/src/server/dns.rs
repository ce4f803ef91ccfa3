use iterdns_domain::config::ServerConfig;
use iterdns_infrastructure::dns::{bind_udp_socket, DnsServerHandler, ResponseCache, UdpDnsServer};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub async fn start_dns_server(
    config: &ServerConfig,
    handler: DnsServerHandler,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = config.listen_addr().parse()?;
    info!(
        bind_address = %socket_addr,
        max_in_flight = config.max_in_flight,
        "Starting DNS server"
    );

    let socket = bind_udp_socket(socket_addr)?;
    let server = UdpDnsServer::new(socket, handler, config.max_in_flight);

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}

/// Sweeps stale entries every `interval`; `None` disables the sweep.
pub fn start_cache_purge(cache: Arc<ResponseCache>, interval: Option<Duration>) {
    let Some(interval) = interval else {
        info!("Cache purge disabled");
        return;
    };

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let purged = cache.purge_expired();
            let metrics = cache.metrics();
            debug!(
                purged,
                entries = metrics.total_entries,
                hits = metrics.hits,
                misses = metrics.misses,
                stale_bypasses = metrics.stale_bypasses,
                hit_rate = metrics.hit_rate,
                "Cache purge completed"
            );
        }
    });
}
