use super::{DnsQuery, RecordType};
use std::net::SocketAddr;
use std::sync::Arc;

/// A validated incoming query together with the client it came from.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub id: u16,
    pub query: DnsQuery,
    pub client: SocketAddr,
}

impl DnsRequest {
    pub fn new(id: u16, query: DnsQuery, client: SocketAddr) -> Self {
        Self { id, query, client }
    }

    pub fn domain(&self) -> &Arc<str> {
        &self.query.domain
    }

    pub fn record_type(&self) -> RecordType {
        self.query.record_type
    }
}
