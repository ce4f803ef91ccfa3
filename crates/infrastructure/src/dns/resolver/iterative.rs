//! Iterative resolution engine.
//!
//! Starts at the seed server and follows NS referrals from the authority
//! section until a server answers, reports a name error, or the walk fails.
//! Every query sent, including those made to find a nameserver's address,
//! spends one hop from a single budget.

use super::{validate_domain_name, ResolvedResponse};
use crate::dns::transport::DnsTransport;
use crate::dns::wire::{
    decode_message, first_address, first_name, first_text, Flags, Message, MessageBuilder, RData,
};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use iterdns_application::ports::{DnsResolution, DnsResolver, ResolutionOutcome};
use iterdns_domain::{DnsQuery, DomainError, RecordType, ResponseCode};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MAX_HOPS: usize = 20;
pub const DEFAULT_HOP_TIMEOUT: Duration = Duration::from_secs(2);

/// What a single server's response means for the walk.
#[derive(Debug)]
enum HopOutcome {
    Answered,
    NameError,
    Referred(String),
}

pub struct IterativeResolver {
    transport: Arc<dyn DnsTransport>,
    seed: SocketAddr,
    hop_timeout: Duration,
    max_hops: usize,
}

impl IterativeResolver {
    pub fn new(transport: Arc<dyn DnsTransport>, seed: SocketAddr) -> Self {
        Self {
            transport,
            seed,
            hop_timeout: DEFAULT_HOP_TIMEOUT,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    pub fn with_hop_timeout(mut self, hop_timeout: Duration) -> Self {
        self.hop_timeout = hop_timeout;
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn seed(&self) -> SocketAddr {
        self.seed
    }

    /// Walks the delegation chain for `query`, starting at the seed.
    pub async fn lookup(&self, query: &DnsQuery) -> Result<ResolvedResponse, DomainError> {
        let mut budget = self.max_hops;
        let mut resolved = self.walk(query, &mut budget).await?;
        resolved.hops = self.max_hops - budget;
        Ok(resolved)
    }

    /// Address of the first A record for `name`.
    pub async fn resolve_address(&self, name: &str) -> Result<Ipv4Addr, DomainError> {
        let bytes = self.answered(name, RecordType::A).await?;
        first_address(&bytes)
    }

    /// Text of the first TXT record for `name`.
    pub async fn resolve_text(&self, name: &str) -> Result<String, DomainError> {
        let bytes = self.answered(name, RecordType::TXT).await?;
        first_text(&bytes)
    }

    /// Name carried by the first `record_type` answer (CNAME, NS or MX).
    pub async fn resolve_name(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<String, DomainError> {
        let bytes = self.answered(name, record_type).await?;
        first_name(&bytes, record_type)
    }

    async fn answered(&self, name: &str, record_type: RecordType) -> Result<Vec<u8>, DomainError> {
        validate_domain_name(name)?;
        self.lookup(&DnsQuery::new(name, record_type))
            .await?
            .into_answer()
    }

    fn walk<'a>(
        &'a self,
        query: &'a DnsQuery,
        budget: &'a mut usize,
    ) -> BoxFuture<'a, Result<ResolvedResponse, DomainError>> {
        async move {
            let mut server = self.seed;

            loop {
                if *budget == 0 {
                    warn!(domain = %query.domain, max_hops = self.max_hops, "Hop limit reached");
                    return Err(DomainError::HopLimitExceeded(self.max_hops));
                }
                *budget -= 1;

                let (bytes, message) = self.send_hop(query, server).await?;

                let ns_name = match classify(&message, server)? {
                    HopOutcome::Answered => {
                        debug!(domain = %query.domain, server = %server, "Answer received");
                        return Ok(ResolvedResponse {
                            bytes,
                            outcome: ResolutionOutcome::Answered,
                            server,
                            hops: 0,
                        });
                    }
                    HopOutcome::NameError => {
                        debug!(domain = %query.domain, server = %server, "Name error received");
                        return Ok(ResolvedResponse {
                            bytes,
                            outcome: ResolutionOutcome::NameError,
                            server,
                            hops: 0,
                        });
                    }
                    HopOutcome::Referred(ns_name) => ns_name,
                };

                let address = match glue_address(&message, &ns_name) {
                    Some(glue) => {
                        debug!(domain = %query.domain, ns = %ns_name, address = %glue, "Following referral via glue");
                        glue
                    }
                    None => {
                        debug!(domain = %query.domain, ns = %ns_name, "Resolving referral nameserver");
                        self.resolve_nameserver(&ns_name, budget).await?
                    }
                };

                // Referral hops keep the seed's port.
                server = SocketAddr::new(IpAddr::V4(address), self.seed.port());
            }
        }
        .boxed()
    }

    async fn send_hop(
        &self,
        query: &DnsQuery,
        server: SocketAddr,
    ) -> Result<(Vec<u8>, Message), DomainError> {
        let (id, request) = MessageBuilder::build_query(query, Flags::QUERY)?;
        debug!(
            domain = %query.domain,
            record_type = %query.record_type,
            server = %server,
            "Sending iterative query"
        );

        let response = self
            .transport
            .send(server, &request, self.hop_timeout)
            .await?;
        let message = decode_message(&response.bytes).map_err(|e| e.into_upstream(server))?;

        if message.header.id != id {
            return Err(DomainError::TransactionIdMismatch {
                expected: id,
                received: message.header.id,
            });
        }

        Ok((response.bytes, message))
    }

    /// Finds an address for a referral target by walking from the seed again,
    /// spending the same budget.
    async fn resolve_nameserver(
        &self,
        ns_name: &str,
        budget: &mut usize,
    ) -> Result<Ipv4Addr, DomainError> {
        let ns_query = DnsQuery::new(ns_name, RecordType::A);
        let resolved = match self.walk(&ns_query, budget).await {
            Ok(resolved) => resolved,
            Err(e @ DomainError::HopLimitExceeded(_)) => return Err(e),
            Err(e) => {
                debug!(ns = %ns_name, error = %e, "Nameserver lookup failed");
                return Err(DomainError::ReferralUnresolvable(ns_name.to_string()));
            }
        };

        if resolved.outcome == ResolutionOutcome::NameError {
            return Err(DomainError::ReferralUnresolvable(ns_name.to_string()));
        }
        first_address(&resolved.bytes)
            .map_err(|_| DomainError::ReferralUnresolvable(ns_name.to_string()))
    }
}

fn classify(message: &Message, server: SocketAddr) -> Result<HopOutcome, DomainError> {
    let rcode = message.header.rcode();
    match rcode {
        ResponseCode::NXDomain => return Ok(HopOutcome::NameError),
        ResponseCode::NoError if !message.answers.is_empty() => return Ok(HopOutcome::Answered),
        _ => {}
    }

    let ns_name = message.authorities.iter().find_map(|rr| match &rr.rdata {
        RData::Ns(name) => Some(name.clone()),
        _ => None,
    });

    match ns_name {
        Some(name) => Ok(HopOutcome::Referred(name)),
        None if rcode != ResponseCode::NoError => Err(DomainError::UpstreamRcode(rcode)),
        None => Err(DomainError::NoReferral {
            server: server.to_string(),
        }),
    }
}

/// Glue for the first NS record that has one, preferring `ns_name` itself.
fn glue_address(message: &Message, ns_name: &str) -> Option<Ipv4Addr> {
    let glue_for = |target: &str| {
        message.additionals.iter().find_map(|rr| match rr.rdata {
            RData::A(addr) if rr.name.eq_ignore_ascii_case(target) => Some(addr),
            _ => None,
        })
    };

    glue_for(ns_name).or_else(|| {
        message.authorities.iter().find_map(|rr| match &rr.rdata {
            RData::Ns(name) => glue_for(name),
            _ => None,
        })
    })
}

#[async_trait]
impl DnsResolver for IterativeResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        self.lookup(query).await.map(DnsResolution::from)
    }

    fn name(&self) -> &'static str {
        "iterative"
    }
}
