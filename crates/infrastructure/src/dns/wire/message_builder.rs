//! DNS Message Builder
//!
//! Constructs outgoing query messages in wire format. Names are always
//! written uncompressed; a single question never repeats a suffix.

use super::header::{Flags, Header, HEADER_LEN};
use super::message::Question;
use iterdns_domain::{DnsQuery, DomainError};

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Encode a single-question query
    ///
    /// Emits the 12-byte header (given id, or a random one when `id` is
    /// `None`; qdcount = 1, other counts 0), the question name as
    /// length-prefixed labels ending in a zero octet, then qtype and qclass.
    ///
    /// Returns the id actually used together with the bytes, so the caller
    /// can match the response.
    pub fn encode_query(
        name: &str,
        qtype: u16,
        qclass: u16,
        flags: Flags,
        id: Option<u16>,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let id = id.unwrap_or_else(|| fastrand::u16(..));

        let mut buf = Vec::with_capacity(HEADER_LEN + name.len() + 6);
        Header::query(id, flags).write_to(&mut buf);
        Question::new(name, qtype, qclass).write_to(&mut buf)?;

        Ok((id, buf))
    }

    /// Build a query for `query` with a random id
    pub fn build_query(query: &DnsQuery, flags: Flags) -> Result<(u16, Vec<u8>), DomainError> {
        Self::encode_query(
            &query.domain,
            query.record_type.to_u16(),
            query.record_class,
            flags,
            None,
        )
    }
}
