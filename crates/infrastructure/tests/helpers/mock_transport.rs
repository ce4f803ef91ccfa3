#![allow(dead_code)]
use async_trait::async_trait;
use iterdns_domain::DomainError;
use iterdns_infrastructure::dns::transport::{DnsTransport, TransportResponse};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

type Route = Box<dyn Fn(&[u8]) -> Result<Vec<u8>, DomainError> + Send + Sync>;

/// In-memory transport with one scripted responder per server address.
///
/// Servers without a route behave as if they never answered.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<SocketAddr, Route>>,
    calls: Mutex<Vec<(SocketAddr, Vec<u8>)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route<F>(&self, server: &str, responder: F)
    where
        F: Fn(&[u8]) -> Result<Vec<u8>, DomainError> + Send + Sync + 'static,
    {
        self.routes
            .lock()
            .unwrap()
            .insert(server.parse().unwrap(), Box::new(responder));
    }

    /// Every (server, request bytes) pair sent so far, in order.
    pub fn calls(&self) -> Vec<(SocketAddr, Vec<u8>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn servers(&self) -> Vec<SocketAddr> {
        self.calls().into_iter().map(|(server, _)| server).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DnsTransport for MockTransport {
    async fn send(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        _timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((server, message_bytes.to_vec()));

        let routes = self.routes.lock().unwrap();
        let responder = routes.get(&server).ok_or(DomainError::QueryTimeout {
            server: server.to_string(),
        })?;
        let bytes = responder(message_bytes)?;
        Ok(TransportResponse { bytes, server })
    }

    fn protocol_name(&self) -> &'static str {
        "MOCK"
    }
}
