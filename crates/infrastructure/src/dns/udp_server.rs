//! UDP serve loop.
//!
//! The receive loop only reads datagrams and spawns one task per request; it
//! never waits for a handler. An optional semaphore caps the number of
//! requests in flight.

use super::server::DnsServerHandler;
use super::wire::MAX_UDP_PAYLOAD;
use socket2::{Domain, Protocol, Socket, Type};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// Binds a non-blocking UDP socket on `addr`.
pub fn bind_udp_socket(addr: SocketAddr) -> io::Result<UdpSocket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.set_nonblocking(true)?;

    UdpSocket::from_std(socket.into())
}

pub struct UdpDnsServer {
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    in_flight: Option<Arc<Semaphore>>,
}

impl UdpDnsServer {
    /// `max_in_flight == 0` leaves the number of concurrent requests unbounded.
    pub fn new(socket: UdpSocket, handler: DnsServerHandler, max_in_flight: usize) -> Self {
        Self {
            socket: Arc::new(socket),
            handler: Arc::new(handler),
            in_flight: (max_in_flight > 0).then(|| Arc::new(Semaphore::new(max_in_flight))),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Serves until `shutdown` completes.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) {
        tokio::select! {
            _ = self.run() => {}
            _ = shutdown => info!("DNS server shutting down"),
        }
    }

    /// Serves forever.
    pub async fn run(&self) {
        if let Ok(addr) = self.socket.local_addr() {
            info!(bind_address = %addr, "DNS server ready");
        }

        let mut recv_buf = [0u8; MAX_UDP_PAYLOAD];

        loop {
            let (n, from) = match self.socket.recv_from(&mut recv_buf).await {
                Ok(received) => received,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // ICMP port-unreachable from an earlier send lands here on some platforms.
                    error!(error = %e, "UDP recv error");
                    continue;
                }
            };

            self.dispatch(&recv_buf[..n], from);
        }
    }

    fn dispatch(&self, query_buf: &[u8], from: SocketAddr) {
        let permit = match &self.in_flight {
            Some(gate) => match Arc::clone(gate).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    warn!(client = %from, "In-flight limit reached, rejecting query");
                    let reply = DnsServerHandler::overloaded_reply(query_buf);
                    if let Err(e) = self.socket.try_send_to(&reply, from) {
                        warn!(client = %from, error = %e, "Failed to send reply");
                    }
                    return;
                }
            },
            None => None,
        };

        let handler = Arc::clone(&self.handler);
        let socket = Arc::clone(&self.socket);
        let owned_buf: Arc<[u8]> = Arc::from(query_buf);
        tokio::spawn(async move {
            let reply = handler.handle_raw(&owned_buf, from).await;
            send_reply(&socket, &reply, from).await;
            drop(permit);
        });
    }
}

async fn send_reply(socket: &UdpSocket, reply: &[u8], to: SocketAddr) {
    match socket.send_to(reply, to).await {
        Ok(sent) => debug!(client = %to, bytes = sent, "Reply sent"),
        Err(e) => warn!(client = %to, error = %e, "Failed to send reply"),
    }
}
