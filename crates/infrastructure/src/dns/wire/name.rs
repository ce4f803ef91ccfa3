//! Domain name encoding and decompression (RFC 1035 §3.1, §4.1.4)

use super::reader::WireReader;
use iterdns_domain::DomainError;

/// Maximum number of compression pointers followed for a single name.
pub const MAX_POINTER_JUMPS: usize = 20;

/// Maximum encoded length of a name, length octets included.
pub const MAX_NAME_LEN: usize = 255;

pub const MAX_LABEL_LEN: usize = 63;

const POINTER_MASK: u8 = 0xC0;

/// Decodes a possibly compressed name at the reader's position.
///
/// Returns the dotted form without a trailing dot (the root decodes to "").
/// Afterwards the cursor sits right after the name's terminating zero octet,
/// or right after the first compression pointer if one was followed.
pub fn decode_name(reader: &mut WireReader<'_>) -> Result<String, DomainError> {
    let msg = reader.message();
    let mut pos = reader.position();
    let mut resume_at: Option<usize> = None;
    let mut jumps = 0usize;
    let mut encoded_len = 0usize;
    let mut name = String::new();

    loop {
        let len = byte_at(msg, pos)?;
        match len & POINTER_MASK {
            0x00 if len == 0 => {
                pos += 1;
                break;
            }
            0x00 => {
                let start = pos + 1;
                let end = start + len as usize;
                if end > msg.len() {
                    return Err(DomainError::Truncated {
                        offset: start,
                        needed: len as usize,
                        available: msg.len().saturating_sub(start),
                    });
                }

                encoded_len += 1 + len as usize;
                // +1 for the terminating root label
                if encoded_len + 1 > MAX_NAME_LEN {
                    return Err(DomainError::NameTooLong);
                }

                let label = std::str::from_utf8(&msg[start..end]).map_err(|_| {
                    DomainError::InvalidLabel {
                        offset: start,
                        reason: "label is not valid UTF-8",
                    }
                })?;
                // A dot inside a label would re-encode as two labels.
                if label.contains('.') {
                    return Err(DomainError::InvalidLabel {
                        offset: start,
                        reason: "label contains '.'",
                    });
                }

                if !name.is_empty() {
                    name.push('.');
                }
                name.push_str(label);
                pos = end;
            }
            POINTER_MASK => {
                let low = byte_at(msg, pos + 1)?;
                let target = (((len & 0x3F) as usize) << 8) | low as usize;
                if target >= pos {
                    return Err(DomainError::BadPointer { at: pos, target });
                }

                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return Err(DomainError::PointerLimitExceeded(MAX_POINTER_JUMPS));
                }

                if resume_at.is_none() {
                    resume_at = Some(pos + 2);
                }
                pos = target;
            }
            _ => {
                return Err(DomainError::InvalidLabel {
                    offset: pos,
                    reason: "reserved label type",
                })
            }
        }
    }

    reader.seek(resume_at.unwrap_or(pos))?;
    Ok(name)
}

/// Moves the cursor past a name without expanding it.
///
/// Pointers are not followed: a pointer always ends the name in place.
pub fn skip_name(reader: &mut WireReader<'_>) -> Result<(), DomainError> {
    let mut encoded_len = 0usize;
    loop {
        let offset = reader.position();
        let len = reader.read_u8()?;
        match len & POINTER_MASK {
            0x00 if len == 0 => return Ok(()),
            0x00 => {
                encoded_len += 1 + len as usize;
                if encoded_len + 1 > MAX_NAME_LEN {
                    return Err(DomainError::NameTooLong);
                }
                reader.skip(len as usize)?;
            }
            POINTER_MASK => return reader.skip(1),
            _ => {
                return Err(DomainError::InvalidLabel {
                    offset,
                    reason: "reserved label type",
                })
            }
        }
    }
}

/// Appends `name` as uncompressed length-prefixed labels.
///
/// A single trailing dot is accepted; "" and "." encode the root.
pub fn encode_name(name: &str, out: &mut Vec<u8>) -> Result<(), DomainError> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() {
        out.push(0);
        return Ok(());
    }

    let mut encoded_len = 1;
    for label in trimmed.split('.') {
        let bytes = label.as_bytes();
        if bytes.is_empty() {
            return Err(DomainError::InvalidDomainName(format!(
                "empty label in '{}'",
                name
            )));
        }
        if bytes.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "label '{}' longer than {} octets",
                label, MAX_LABEL_LEN
            )));
        }
        encoded_len += 1 + bytes.len();
        if encoded_len > MAX_NAME_LEN {
            return Err(DomainError::NameTooLong);
        }
        out.push(bytes.len() as u8);
        out.extend_from_slice(bytes);
    }
    out.push(0);
    Ok(())
}

#[inline]
fn byte_at(msg: &[u8], pos: usize) -> Result<u8, DomainError> {
    msg.get(pos).copied().ok_or(DomainError::Truncated {
        offset: pos,
        needed: 1,
        available: 0,
    })
}
