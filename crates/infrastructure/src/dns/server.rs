use super::fast_path;
use super::wire_response::{build_error_response, request_id, with_transaction_id};
use iterdns_application::use_cases::HandleDnsQueryUseCase;
use iterdns_domain::{DnsRequest, DomainError};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Turns one request datagram into exactly one reply datagram.
///
/// Every failure, whether in parsing, validation or resolution, ends in a
/// synthetic reply whose RCODE comes from [`DomainError::response_code`].
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    pub async fn handle_raw(&self, query_buf: &[u8], client: SocketAddr) -> Vec<u8> {
        let parsed = match fast_path::parse_query(query_buf) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(client = %client, len = query_buf.len(), error = %e, "Malformed request");
                return Self::error_reply(request_id(query_buf), &e);
            }
        };

        let request = DnsRequest::new(parsed.id, parsed.query, client);
        info!(
            domain = %request.domain(),
            record_type = %request.record_type(),
            client = %client,
            "DNS query received"
        );

        match self.use_case.execute(&request).await {
            Ok(resolution) => {
                debug!(
                    domain = %request.domain(),
                    outcome = resolution.outcome.as_str(),
                    cache_hit = resolution.cache_hit,
                    "Sending response"
                );
                with_transaction_id(&resolution.bytes, request.id)
            }
            Err(e) => {
                warn!(domain = %request.domain(), error = %e, "Query resolution failed");
                Self::error_reply(request.id, &e)
            }
        }
    }

    /// Reply sent instead of handling a request when no capacity is left.
    pub fn overloaded_reply(query_buf: &[u8]) -> Vec<u8> {
        Self::error_reply(request_id(query_buf), &DomainError::Overloaded)
    }

    fn error_reply(id: u16, error: &DomainError) -> Vec<u8> {
        let code = error.response_code();
        debug!(code = %code, "Sending error response");
        build_error_response(id, code).to_vec()
    }
}
