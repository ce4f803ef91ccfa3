//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing) and responses are limited to 512
//! bytes. Each exchange binds its own ephemeral socket, connected to the
//! target server so that datagrams from any other source are dropped by the
//! kernel, and closes it when the exchange ends.

use super::{DnsTransport, TransportResponse};
use crate::dns::wire::MAX_UDP_PAYLOAD;
use async_trait::async_trait;
use iterdns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// DNS over UDP transport
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpTransport;

impl UdpTransport {
    pub fn new() -> Self {
        Self
    }

    async fn exchange(server: SocketAddr, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(server).await?;

        let bytes_sent = socket.send(message_bytes).await?;
        debug!(server = %server, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_PAYLOAD];
        let bytes_received = socket.recv(&mut recv_buf).await?;
        recv_buf.truncate(bytes_received);

        debug!(
            server = %server,
            bytes_received = bytes_received,
            "UDP response received"
        );

        Ok(recv_buf)
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let bytes = tokio::time::timeout(timeout, Self::exchange(server, message_bytes))
            .await
            .map_err(|_| DomainError::QueryTimeout {
                server: server.to_string(),
            })??;

        Ok(TransportResponse { bytes, server })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
