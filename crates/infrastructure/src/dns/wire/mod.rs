//! RFC 1035 message codec.

pub mod extract;
pub mod header;
pub mod message;
pub mod message_builder;
pub mod name;
pub mod reader;

pub use extract::{
    first_address, first_cname, first_name, first_text, has_answer, referrals, Referral,
};
pub use header::{decode_header, Flags, Header, HEADER_LEN};
pub use message::{
    decode_message, decode_question, decode_resource_record, skip_question,
    skip_resource_record, Message, Question, RData, ResourceRecord,
};
pub use message_builder::MessageBuilder;
pub use name::{decode_name, encode_name, skip_name, MAX_NAME_LEN, MAX_POINTER_JUMPS};
pub use reader::WireReader;

/// Conventional DNS-over-UDP payload limit without EDNS0.
pub const MAX_UDP_PAYLOAD: usize = 512;
