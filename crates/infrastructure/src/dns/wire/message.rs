use super::header::{read_header, Header};
use super::name::{decode_name, encode_name, skip_name};
use super::reader::WireReader;
use iterdns_domain::{DomainError, RecordType};
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: impl Into<String>, qtype: u16, qclass: u16) -> Self {
        Self {
            name: name.into(),
            qtype,
            qclass,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.qtype)
    }

    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), DomainError> {
        encode_name(&self.name, out)?;
        out.extend_from_slice(&self.qtype.to_be_bytes());
        out.extend_from_slice(&self.qclass.to_be_bytes());
        Ok(())
    }
}

/// Type-dependent interpretation of a record's RDATA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Ns(String),
    Cname(String),
    Mx { preference: u16, exchange: String },
    /// The record's character-strings, in order.
    Txt(Vec<String>),
    Unknown(Vec<u8>),
}

impl RData {
    /// Concatenation of all character-strings of a TXT record.
    pub fn text(&self) -> Option<String> {
        match self {
            RData::Txt(parts) => Some(parts.concat()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub rtype: u16,
    pub class: u16,
    /// Unsigned on the wire; never interpreted as negative.
    pub ttl: u32,
    pub rdata: RData,
}

impl ResourceRecord {
    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.rtype)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

/// Decodes a complete message: header, questions, then the three record
/// sections according to their counts.
///
/// A section holding fewer parseable records than its count announces is
/// malformed and fails with the underlying codec error.
pub fn decode_message(buf: &[u8]) -> Result<Message, DomainError> {
    let mut reader = WireReader::new(buf);
    let header = read_header(&mut reader)?;

    let mut questions = Vec::with_capacity(header.qdcount as usize);
    for _ in 0..header.qdcount {
        questions.push(decode_question(&mut reader)?);
    }

    let answers = decode_section(&mut reader, header.ancount)?;
    let authorities = decode_section(&mut reader, header.nscount)?;
    let additionals = decode_section(&mut reader, header.arcount)?;

    Ok(Message {
        header,
        questions,
        answers,
        authorities,
        additionals,
    })
}

pub fn decode_question(reader: &mut WireReader<'_>) -> Result<Question, DomainError> {
    let name = decode_name(reader)?;
    let qtype = reader.read_u16()?;
    let qclass = reader.read_u16()?;
    Ok(Question {
        name,
        qtype,
        qclass,
    })
}

pub fn skip_question(reader: &mut WireReader<'_>) -> Result<(), DomainError> {
    skip_name(reader)?;
    reader.skip(4)
}

/// Reads name, type, class, ttl, rdlength and exactly rdlength bytes of RDATA.
pub fn decode_resource_record(reader: &mut WireReader<'_>) -> Result<ResourceRecord, DomainError> {
    let name = decode_name(reader)?;
    let rtype = reader.read_u16()?;
    let class = reader.read_u16()?;
    let ttl = reader.read_u32()?;
    let rdlength = reader.read_u16()? as usize;

    let rdata_start = reader.position();
    if reader.remaining() < rdlength {
        return Err(DomainError::Truncated {
            offset: rdata_start,
            needed: rdlength,
            available: reader.remaining(),
        });
    }
    let rdata_end = rdata_start + rdlength;
    let rdata = decode_rdata(reader.message(), rtype, rdata_start, rdata_end)?;
    reader.seek(rdata_end)?;

    Ok(ResourceRecord {
        name,
        rtype,
        class,
        ttl,
        rdata,
    })
}

pub fn skip_resource_record(reader: &mut WireReader<'_>) -> Result<(), DomainError> {
    skip_name(reader)?;
    // type, class, ttl
    reader.skip(8)?;
    let rdlength = reader.read_u16()? as usize;
    reader.skip(rdlength)
}

fn decode_section(
    reader: &mut WireReader<'_>,
    count: u16,
) -> Result<Vec<ResourceRecord>, DomainError> {
    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        records.push(decode_resource_record(reader)?);
    }
    Ok(records)
}

fn decode_rdata(msg: &[u8], rtype: u16, start: usize, end: usize) -> Result<RData, DomainError> {
    let rdata = &msg[start..end];
    let invalid = |reason: &str| DomainError::InvalidRdata {
        rtype,
        reason: reason.to_string(),
    };

    match RecordType::from_u16(rtype) {
        Some(RecordType::A) => {
            let octets: [u8; 4] = rdata
                .try_into()
                .map_err(|_| invalid("A record must be 4 bytes"))?;
            Ok(RData::A(Ipv4Addr::from(octets)))
        }
        Some(RecordType::NS) => Ok(RData::Ns(name_within(msg, rtype, start, end)?)),
        Some(RecordType::CNAME) => Ok(RData::Cname(name_within(msg, rtype, start, end)?)),
        Some(RecordType::MX) => {
            if rdata.len() < 3 {
                return Err(invalid("MX record shorter than 3 bytes"));
            }
            let preference = u16::from_be_bytes([rdata[0], rdata[1]]);
            let exchange = name_within(msg, rtype, start + 2, end)?;
            Ok(RData::Mx {
                preference,
                exchange,
            })
        }
        Some(RecordType::TXT) => {
            let mut parts = Vec::new();
            let mut pos = 0;
            while pos < rdata.len() {
                let len = rdata[pos] as usize;
                pos += 1;
                if pos + len > rdata.len() {
                    return Err(invalid("character-string overruns RDATA"));
                }
                parts.push(String::from_utf8_lossy(&rdata[pos..pos + len]).into_owned());
                pos += len;
            }
            Ok(RData::Txt(parts))
        }
        None => Ok(RData::Unknown(rdata.to_vec())),
    }
}

/// Decodes a name that starts at `start` and must not run past `end`.
///
/// Compression pointers may still reach back anywhere earlier in the message.
fn name_within(msg: &[u8], rtype: u16, start: usize, end: usize) -> Result<String, DomainError> {
    let mut reader = WireReader::at(msg, start);
    let name = decode_name(&mut reader)?;
    if reader.position() > end {
        return Err(DomainError::InvalidRdata {
            rtype,
            reason: "name overruns RDATA".to_string(),
        });
    }
    Ok(name)
}
