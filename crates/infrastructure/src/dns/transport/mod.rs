pub mod udp;

use async_trait::async_trait;
use iterdns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

pub use udp::UdpTransport;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub server: SocketAddr,
}

/// One request/response exchange with a DNS server.
///
/// Every call stands alone: no connection or socket is reused between calls,
/// and a missing response within `timeout` is reported as
/// [`DomainError::QueryTimeout`] without retrying.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
