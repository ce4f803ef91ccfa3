//! Stub client: one recursive query to an upstream trusted to do the work.

use super::validate_domain_name;
use crate::dns::transport::DnsTransport;
use crate::dns::wire::{
    decode_header, first_address, first_name, first_text, has_answer, Flags, MessageBuilder,
};
use async_trait::async_trait;
use iterdns_application::ports::{DnsResolution, DnsResolver, ResolutionOutcome};
use iterdns_domain::{DnsQuery, DomainError, RecordType, ResponseCode};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_STUB_TIMEOUT: Duration = Duration::from_secs(5);

pub struct StubResolver {
    transport: Arc<dyn DnsTransport>,
    upstream: SocketAddr,
    timeout: Duration,
}

impl StubResolver {
    pub fn new(transport: Arc<dyn DnsTransport>, upstream: SocketAddr) -> Self {
        Self {
            transport,
            upstream,
            timeout: DEFAULT_STUB_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends one query with RD set and returns the raw response and its RCODE.
    ///
    /// Blank names and names with control characters fail before anything is
    /// sent.
    pub async fn exchange(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<(Vec<u8>, ResponseCode), DomainError> {
        validate_domain_name(name)?;

        let query = DnsQuery::new(name, record_type);
        let (id, request) = MessageBuilder::build_query(&query, Flags::RECURSIVE_QUERY)?;
        debug!(
            domain = %name,
            record_type = %record_type,
            upstream = %self.upstream,
            "Sending recursive query"
        );

        let response = self
            .transport
            .send(self.upstream, &request, self.timeout)
            .await?;
        let header = decode_header(&response.bytes).map_err(|e| e.into_upstream(self.upstream))?;

        if header.id != id {
            return Err(DomainError::TransactionIdMismatch {
                expected: id,
                received: header.id,
            });
        }

        Ok((response.bytes, header.rcode()))
    }

    /// A NOERROR response holding at least one `record_type` answer.
    pub async fn query(&self, name: &str, record_type: RecordType) -> Result<Vec<u8>, DomainError> {
        let (bytes, rcode) = self.exchange(name, record_type).await?;
        if rcode != ResponseCode::NoError {
            return Err(DomainError::UpstreamRcode(rcode));
        }
        if !self.has_answer(&bytes, record_type)? {
            return Err(DomainError::NoMatchingAnswer(record_type.to_string()));
        }
        Ok(bytes)
    }

    pub async fn resolve_address(&self, name: &str) -> Result<Ipv4Addr, DomainError> {
        let bytes = self.query(name, RecordType::A).await?;
        first_address(&bytes)
    }

    pub async fn resolve_text(&self, name: &str) -> Result<String, DomainError> {
        let bytes = self.query(name, RecordType::TXT).await?;
        first_text(&bytes)
    }

    pub async fn resolve_name(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<String, DomainError> {
        let bytes = self.query(name, record_type).await?;
        first_name(&bytes, record_type)
    }

    fn has_answer(&self, bytes: &[u8], record_type: RecordType) -> Result<bool, DomainError> {
        has_answer(bytes, record_type).map_err(|e| e.into_upstream(self.upstream))
    }
}

#[async_trait]
impl DnsResolver for StubResolver {
    /// Forwards the query upstream; a name error is relayed as a result.
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        let (bytes, rcode) = self.exchange(&query.domain, query.record_type).await?;

        let outcome = match rcode {
            ResponseCode::NXDomain => ResolutionOutcome::NameError,
            ResponseCode::NoError if self.has_answer(&bytes, query.record_type)? => {
                ResolutionOutcome::Answered
            }
            ResponseCode::NoError => {
                return Err(DomainError::NoMatchingAnswer(query.record_type.to_string()))
            }
            other => return Err(DomainError::UpstreamRcode(other)),
        };

        Ok(DnsResolution::new(bytes, outcome).with_upstream(self.upstream, 1))
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}
