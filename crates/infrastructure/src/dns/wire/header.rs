use super::reader::WireReader;
use iterdns_domain::{DomainError, ResponseCode};

pub const HEADER_LEN: usize = 12;

/// The 16-bit flags word of a DNS header.
///
/// Layout: QR:1 OPCODE:4 AA:1 TC:1 RD:1 RA:1 Z:3 RCODE:4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(pub u16);

impl Flags {
    pub const QR: u16 = 0x8000;
    pub const AA: u16 = 0x0400;
    pub const TC: u16 = 0x0200;
    pub const RD: u16 = 0x0100;
    pub const RA: u16 = 0x0080;

    /// Flags of a plain iterative query: everything clear.
    pub const QUERY: Flags = Flags(0);

    /// Flags of a query asking the upstream to recurse.
    pub const RECURSIVE_QUERY: Flags = Flags(Self::RD);

    /// Flags of a synthetic reply carrying `rcode`.
    pub fn response(rcode: ResponseCode) -> Self {
        Flags(Self::QR | rcode.to_u8() as u16)
    }

    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn is_response(self) -> bool {
        self.0 & Self::QR != 0
    }

    #[inline]
    pub fn opcode(self) -> u8 {
        ((self.0 >> 11) & 0x0F) as u8
    }

    #[inline]
    pub fn authoritative(self) -> bool {
        self.0 & Self::AA != 0
    }

    #[inline]
    pub fn truncated(self) -> bool {
        self.0 & Self::TC != 0
    }

    #[inline]
    pub fn recursion_desired(self) -> bool {
        self.0 & Self::RD != 0
    }

    #[inline]
    pub fn recursion_available(self) -> bool {
        self.0 & Self::RA != 0
    }

    #[inline]
    pub fn z(self) -> u8 {
        ((self.0 >> 4) & 0x07) as u8
    }

    #[inline]
    pub fn rcode(self) -> ResponseCode {
        ResponseCode::from_u8((self.0 & 0x0F) as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    pub flags: Flags,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    pub fn query(id: u16, flags: Flags) -> Self {
        Self {
            id,
            flags,
            qdcount: 1,
            ancount: 0,
            nscount: 0,
            arcount: 0,
        }
    }

    #[inline]
    pub fn rcode(&self) -> ResponseCode {
        self.flags.rcode()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags.bits().to_be_bytes());
        out.extend_from_slice(&self.qdcount.to_be_bytes());
        out.extend_from_slice(&self.ancount.to_be_bytes());
        out.extend_from_slice(&self.nscount.to_be_bytes());
        out.extend_from_slice(&self.arcount.to_be_bytes());
    }
}

/// Decodes the fixed 12-byte header at the start of `buf`.
pub fn decode_header(buf: &[u8]) -> Result<Header, DomainError> {
    if buf.len() < HEADER_LEN {
        return Err(DomainError::MessageTooShort { len: buf.len() });
    }
    let mut reader = WireReader::new(buf);
    read_header(&mut reader)
}

pub(super) fn read_header(reader: &mut WireReader<'_>) -> Result<Header, DomainError> {
    if reader.message().len() < HEADER_LEN {
        return Err(DomainError::MessageTooShort {
            len: reader.message().len(),
        });
    }
    Ok(Header {
        id: reader.read_u16()?,
        flags: Flags(reader.read_u16()?),
        qdcount: reader.read_u16()?,
        ancount: reader.read_u16()?,
        nscount: reader.read_u16()?,
        arcount: reader.read_u16()?,
    })
}
