//! Typed extraction from raw response bytes.
//!
//! These walk the message section by section and skip over everything that
//! is irrelevant to the value being extracted.

use super::header::decode_header;
use super::message::{
    decode_resource_record, skip_question, skip_resource_record, RData, ResourceRecord,
};
use super::reader::WireReader;
use iterdns_domain::{DomainError, RecordType};
use std::fmt;
use std::net::Ipv4Addr;

/// A delegation hint found in the authority section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Referral {
    Ns(String),
    Cname(String),
}

impl Referral {
    pub fn target(&self) -> &str {
        match self {
            Referral::Ns(name) | Referral::Cname(name) => name,
        }
    }

    /// Builds a referral from an authority record, if it carries one.
    pub fn from_record(record: &ResourceRecord) -> Option<Self> {
        match &record.rdata {
            RData::Ns(name) => Some(Referral::Ns(name.clone())),
            RData::Cname(name) => Some(Referral::Cname(name.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Referral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Referral::Ns(name) => write!(f, "NS {}", name),
            Referral::Cname(name) => write!(f, "CNAME {}", name),
        }
    }
}

/// Address of the first A record in the answer section.
pub fn first_address(bytes: &[u8]) -> Result<Ipv4Addr, DomainError> {
    find_answer(bytes, RecordType::A, |rdata| match rdata {
        RData::A(addr) => Some(*addr),
        _ => None,
    })
}

/// Concatenated text of the first TXT record in the answer section.
pub fn first_text(bytes: &[u8]) -> Result<String, DomainError> {
    find_answer(bytes, RecordType::TXT, RData::text)
}

/// Target of the first CNAME record in the answer section.
pub fn first_cname(bytes: &[u8]) -> Result<String, DomainError> {
    first_name(bytes, RecordType::CNAME)
}

/// Name carried by the first answer of a name-valued type (NS, CNAME, MX).
pub fn first_name(bytes: &[u8], record_type: RecordType) -> Result<String, DomainError> {
    find_answer(bytes, record_type, |rdata| match rdata {
        RData::Ns(name) | RData::Cname(name) => Some(name.clone()),
        RData::Mx { exchange, .. } => Some(exchange.clone()),
        _ => None,
    })
}

/// True when the answer section holds at least one record of `record_type`.
pub fn has_answer(bytes: &[u8], record_type: RecordType) -> Result<bool, DomainError> {
    match find_answer(bytes, record_type, |_| Some(())) {
        Ok(()) => Ok(true),
        Err(DomainError::NoMatchingAnswer(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// NS and CNAME names from the authority section only.
///
/// The answer and additional sections are never consulted.
pub fn referrals(bytes: &[u8]) -> Result<Vec<Referral>, DomainError> {
    let header = decode_header(bytes)?;
    let mut reader = WireReader::new(bytes);
    reader.skip(super::header::HEADER_LEN)?;

    for _ in 0..header.qdcount {
        skip_question(&mut reader)?;
    }
    for _ in 0..header.ancount {
        skip_resource_record(&mut reader)?;
    }

    let mut found = Vec::new();
    for _ in 0..header.nscount {
        let record = decode_resource_record(&mut reader)?;
        if let Some(referral) = Referral::from_record(&record) {
            found.push(referral);
        }
    }
    Ok(found)
}

fn find_answer<T>(
    bytes: &[u8],
    record_type: RecordType,
    pick: impl Fn(&RData) -> Option<T>,
) -> Result<T, DomainError> {
    let header = decode_header(bytes)?;
    let mut reader = WireReader::new(bytes);
    reader.skip(super::header::HEADER_LEN)?;

    for _ in 0..header.qdcount {
        skip_question(&mut reader)?;
    }

    let wanted = record_type.to_u16();
    for _ in 0..header.ancount {
        let record = decode_resource_record(&mut reader)?;
        if record.rtype != wanted {
            continue;
        }
        if let Some(value) = pick(&record.rdata) {
            return Ok(value);
        }
    }

    Err(DomainError::NoMatchingAnswer(record_type.to_string()))
}
