pub mod cache;
pub mod fast_path;
pub mod resolver;
pub mod server;
pub mod transport;
pub mod udp_server;
pub mod wire;
pub mod wire_response;

pub use cache::{CacheKey, CacheMetricsSnapshot, ResponseCache};
pub use resolver::{IterativeResolver, ResolvedResponse, StubResolver};
pub use server::DnsServerHandler;
pub use transport::{DnsTransport, TransportResponse, UdpTransport};
pub use udp_server::{bind_udp_socket, UdpDnsServer};
