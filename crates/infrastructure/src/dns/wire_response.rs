use super::wire::{Flags, Header, HEADER_LEN};
use iterdns_domain::ResponseCode;

/// Builds the minimal synthetic reply sent when a request cannot be answered.
///
/// The reply copies the transaction id, sets QR and `rcode` in the flags and
/// zeroes all four section counts. It is exactly one header long.
pub fn build_error_response(id: u16, rcode: ResponseCode) -> [u8; HEADER_LEN] {
    let header = Header {
        id,
        flags: Flags::response(rcode),
        qdcount: 0,
        ancount: 0,
        nscount: 0,
        arcount: 0,
    };
    let mut buf = [0u8; HEADER_LEN];
    buf[0..2].copy_from_slice(&header.id.to_be_bytes());
    buf[2..4].copy_from_slice(&header.flags.bits().to_be_bytes());
    buf
}

/// Transaction id of a raw request, or 0 when the datagram is too short to
/// carry one.
pub fn request_id(query_buf: &[u8]) -> u16 {
    match query_buf {
        [hi, lo, ..] => u16::from_be_bytes([*hi, *lo]),
        _ => 0,
    }
}

/// Copies `response` with its transaction id replaced by `id`.
///
/// Everything after the first two bytes is returned verbatim.
pub fn with_transaction_id(response: &[u8], id: u16) -> Vec<u8> {
    let mut out = response.to_vec();
    if out.len() >= 2 {
        out[0..2].copy_from_slice(&id.to_be_bytes());
    }
    out
}
