use super::wire::{decode_header, decode_question, WireReader, HEADER_LEN};
use iterdns_domain::{DnsQuery, DomainError, RecordType, CLASS_IN};

/// Result of validating a raw DNS query buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub id: u16,
    /// The first question, with the name lower-cased and without a trailing dot.
    pub query: DnsQuery,
    /// Byte offset in the original buffer where the question section ends.
    pub question_end: usize,
}

/// Validates an incoming request and extracts the query it asks.
///
/// Rejected with a format error:
///
/// * Buffer shorter than 12 bytes
/// * QDCOUNT = 0
/// * Any question whose name does not decode
/// * Any QTYPE outside A, NS, CNAME, MX, TXT
/// * Any QCLASS other than IN (1)
pub fn parse_query(buf: &[u8]) -> Result<ParsedQuery, DomainError> {
    let header = decode_header(buf)?;
    if header.qdcount == 0 {
        return Err(DomainError::MissingQuestion);
    }

    let mut reader = WireReader::at(buf, HEADER_LEN);
    let mut first: Option<DnsQuery> = None;

    for _ in 0..header.qdcount {
        let question = decode_question(&mut reader)?;
        let record_type = RecordType::from_u16(question.qtype)
            .ok_or(DomainError::UnsupportedRecordType(question.qtype))?;
        if question.qclass != CLASS_IN {
            return Err(DomainError::UnsupportedClass(question.qclass));
        }

        if first.is_none() {
            first = Some(DnsQuery::new(
                question.name.to_ascii_lowercase(),
                record_type,
            ));
        }
    }

    let query = first.ok_or(DomainError::MissingQuestion)?;
    Ok(ParsedQuery {
        id: header.id,
        query,
        question_end: reader.position(),
    })
}
