mod helpers;

use helpers::{query_for, MockDnsServer, ResponseBuilder};
use iterdns_application::use_cases::HandleDnsQueryUseCase;
use iterdns_domain::ResponseCode;
use iterdns_infrastructure::dns::cache::ResponseCache;
use iterdns_infrastructure::dns::resolver::IterativeResolver;
use iterdns_infrastructure::dns::server::DnsServerHandler;
use iterdns_infrastructure::dns::transport::UdpTransport;
use iterdns_infrastructure::dns::udp_server::{bind_udp_socket, UdpDnsServer};
use iterdns_infrastructure::dns::wire::{decode_header, first_address};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

struct TestServer {
    addr: SocketAddr,
    cache: Arc<ResponseCache>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn start_server(seed: SocketAddr, max_in_flight: usize) -> TestServer {
    let resolver = IterativeResolver::new(Arc::new(UdpTransport::new()), seed)
        .with_hop_timeout(Duration::from_millis(300));
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(10)));
    let use_case = Arc::new(HandleDnsQueryUseCase::new(Arc::new(resolver), cache.clone()));
    let handler = DnsServerHandler::new(use_case);

    let socket = bind_udp_socket("127.0.0.1:0".parse().unwrap()).unwrap();
    let server = UdpDnsServer::new(socket, handler, max_in_flight);
    let addr = server.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(server.run_until(async move {
        let _ = shutdown_rx.await;
    }));

    TestServer {
        addr,
        cache,
        shutdown_tx: Some(shutdown_tx),
    }
}

async fn exchange(client: &UdpSocket, server: SocketAddr, request: &[u8]) -> Vec<u8> {
    client.send_to(request, server).await.unwrap();
    let mut buf = [0u8; 512];
    let (len, _) = tokio::time::timeout(Duration::from_secs(3), client.recv_from(&mut buf))
        .await
        .expect("no reply from server")
        .unwrap();
    buf[..len].to_vec()
}

async fn client() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").await.unwrap()
}

fn answering_upstream() -> impl Fn(&[u8]) -> Option<Vec<u8>> + Send + Sync + 'static {
    |req| {
        Some(
            ResponseBuilder::reply_to(req)
                .authoritative()
                .answer_a_ptr(Ipv4Addr::new(93, 184, 216, 34))
                .build(),
        )
    }
}

// ── request validation ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_short_datagram_gets_formerr() {
    let upstream = MockDnsServer::start(answering_upstream()).await;
    let server = start_server(upstream.addr(), 0).await;
    let client = client().await;

    let reply = exchange(&client, server.addr, &[0xAB, 0xCD, 0x01]).await;
    assert_eq!(reply, vec![0xAB, 0xCD, 0x80, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(upstream.request_count(), 0);
}

#[tokio::test]
async fn test_invalid_questions_get_formerr() {
    let upstream = MockDnsServer::start(answering_upstream()).await;
    let server = start_server(upstream.addr(), 0).await;
    let client = client().await;

    let mut no_question = query_for("example.com", 1, 0x0101);
    no_question[5] = 0;
    let unsupported_type = query_for("example.com", 999, 0x0202);

    for request in [no_question, unsupported_type] {
        let reply = exchange(&client, server.addr, &request).await;
        let header = decode_header(&reply).unwrap();
        assert_eq!(header.id, u16::from_be_bytes([request[0], request[1]]));
        assert!(header.flags.is_response());
        assert_eq!(header.rcode(), ResponseCode::FormErr);
        assert_eq!(
            (header.qdcount, header.ancount, header.nscount, header.arcount),
            (0, 0, 0, 0)
        );
    }
    assert_eq!(upstream.request_count(), 0);
}

// ── resolution and caching ─────────────────────────────────────────────────

#[tokio::test]
async fn test_resolves_then_serves_from_cache_with_client_id() {
    let upstream = MockDnsServer::start(answering_upstream()).await;
    let server = start_server(upstream.addr(), 0).await;
    let client = client().await;

    let first = exchange(&client, server.addr, &query_for("example.com", 1, 0x1111)).await;
    let second = exchange(&client, server.addr, &query_for("Example.com", 1, 0x2222)).await;

    assert_eq!(decode_header(&first).unwrap().id, 0x1111);
    assert_eq!(decode_header(&second).unwrap().id, 0x2222);
    assert_eq!(first[2..], second[2..]);
    assert_eq!(first_address(&second).unwrap(), Ipv4Addr::new(93, 184, 216, 34));
    assert_eq!(upstream.request_count(), 1);
    assert_eq!(server.cache.len(), 1);
}

#[tokio::test]
async fn test_name_error_is_relayed() {
    let upstream =
        MockDnsServer::start(|req| Some(ResponseBuilder::reply_to(req).rcode(3).build())).await;
    let server = start_server(upstream.addr(), 0).await;
    let client = client().await;

    let reply = exchange(&client, server.addr, &query_for("nope.invalid", 1, 0x3333)).await;
    let header = decode_header(&reply).unwrap();
    assert_eq!(header.id, 0x3333);
    assert_eq!(header.rcode(), ResponseCode::NXDomain);
    assert_eq!(header.qdcount, 1);
}

#[tokio::test]
async fn test_silent_upstream_gets_servfail_and_is_not_cached() {
    let upstream = MockDnsServer::start(|_| None).await;
    let server = start_server(upstream.addr(), 0).await;
    let client = client().await;

    let reply = exchange(&client, server.addr, &query_for("slow.example", 1, 0x4444)).await;
    let header = decode_header(&reply).unwrap();
    assert_eq!(header.id, 0x4444);
    assert_eq!(header.rcode(), ResponseCode::ServFail);
    assert_eq!(server.cache.len(), 0);
}

#[tokio::test]
async fn test_malformed_upstream_reply_gets_servfail_and_is_not_cached() {
    let upstream = MockDnsServer::start(|req| {
        let mut bytes = ResponseBuilder::reply_to(req)
            .answer_a("example.com", Ipv4Addr::new(93, 184, 216, 34))
            .build();
        bytes.truncate(bytes.len() - 2);
        Some(bytes)
    })
    .await;
    let server = start_server(upstream.addr(), 0).await;
    let client = client().await;

    let reply = exchange(&client, server.addr, &query_for("example.com", 1, 0x7777)).await;
    let header = decode_header(&reply).unwrap();
    assert_eq!(header.id, 0x7777);
    assert_eq!(header.rcode(), ResponseCode::ServFail);
    assert_eq!(reply.len(), 12);
    assert_eq!(upstream.request_count(), 1);
    assert_eq!(server.cache.len(), 0);
}

// ── admission control ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_requests_beyond_in_flight_limit_get_servfail() {
    let upstream = MockDnsServer::start(|_| None).await;
    let server = start_server(upstream.addr(), 1).await;
    let busy = client().await;
    let rejected = client().await;

    // Occupies the only slot until the 300 ms hop timeout fires.
    busy.send_to(&query_for("slow.example", 1, 0x5555), server.addr)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let reply = exchange(&rejected, server.addr, &query_for("other.example", 1, 0x6666)).await;
    let header = decode_header(&reply).unwrap();
    assert_eq!(header.id, 0x6666);
    assert_eq!(header.rcode(), ResponseCode::ServFail);
    assert_eq!(upstream.request_count(), 1);
}
