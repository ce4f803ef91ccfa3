mod record_type;

pub use record_type::RecordType;

/// The only query class accepted by the server (RFC 1035 §3.2.4).
pub const CLASS_IN: u16 = 1;
