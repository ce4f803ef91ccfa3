use crate::ResponseCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Message too short: {len} bytes (header needs 12)")]
    MessageTooShort { len: usize },

    #[error("Truncated message: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Invalid label at offset {offset}: {reason}")]
    InvalidLabel { offset: usize, reason: &'static str },

    #[error("Compression pointer at offset {at} targets {target}, which is not an earlier position")]
    BadPointer { at: usize, target: usize },

    #[error("More than {0} compression pointers followed while decoding a name")]
    PointerLimitExceeded(usize),

    #[error("Domain name exceeds 255 octets")]
    NameTooLong,

    #[error("Invalid RDATA for type {rtype}: {reason}")]
    InvalidRdata { rtype: u16, reason: String },

    #[error("Query has no question")]
    MissingQuestion,

    #[error("Unsupported record type: {0}")]
    UnsupportedRecordType(u16),

    #[error("Unsupported query class: {0}")]
    UnsupportedClass(u16),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Query timeout waiting for {server}")]
    QueryTimeout { server: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Response from {server} has no answer and no referral")]
    NoReferral { server: String },

    #[error("Referral chain exceeded {0} hops")]
    HopLimitExceeded(usize),

    #[error("Could not resolve nameserver {0}")]
    ReferralUnresolvable(String),

    #[error("Malformed response from {server}: {reason}")]
    MalformedResponse { server: String, reason: String },

    #[error("Response id {received:#06x} does not match query id {expected:#06x}")]
    TransactionIdMismatch { expected: u16, received: u16 },

    #[error("Upstream answered with {0}")]
    UpstreamRcode(ResponseCode),

    #[error("No {0} record in the answer section")]
    NoMatchingAnswer(String),

    #[error("Server is at its in-flight query limit")]
    Overloaded,
}

impl DomainError {
    /// True for errors caused by a malformed or unsupported request.
    pub fn is_format_error(&self) -> bool {
        self.response_code() == ResponseCode::FormErr
    }

    /// Maps every failure to the RCODE of the synthetic reply sent to the client.
    ///
    /// Problems with the client's own request are FORMERR (1); everything that
    /// happens while resolving is SERVFAIL (2), including undecodable upstream
    /// replies, which arrive here as [`DomainError::MalformedResponse`].
    pub fn response_code(&self) -> ResponseCode {
        match self {
            DomainError::MessageTooShort { .. }
            | DomainError::Truncated { .. }
            | DomainError::InvalidLabel { .. }
            | DomainError::BadPointer { .. }
            | DomainError::PointerLimitExceeded(_)
            | DomainError::NameTooLong
            | DomainError::InvalidRdata { .. }
            | DomainError::MissingQuestion
            | DomainError::UnsupportedRecordType(_)
            | DomainError::UnsupportedClass(_)
            | DomainError::InvalidDomainName(_) => ResponseCode::FormErr,

            DomainError::QueryTimeout { .. }
            | DomainError::Io(_)
            | DomainError::NoReferral { .. }
            | DomainError::HopLimitExceeded(_)
            | DomainError::ReferralUnresolvable(_)
            | DomainError::MalformedResponse { .. }
            | DomainError::TransactionIdMismatch { .. }
            | DomainError::UpstreamRcode(_)
            | DomainError::NoMatchingAnswer(_)
            | DomainError::Overloaded => ResponseCode::ServFail,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DomainError::QueryTimeout { .. })
    }

    /// Re-labels a codec error raised on bytes received from `server`.
    ///
    /// Resolution errors pass through unchanged.
    pub fn into_upstream(self, server: impl std::fmt::Display) -> Self {
        if self.is_format_error() {
            DomainError::MalformedResponse {
                server: server.to_string(),
                reason: self.to_string(),
            }
        } else {
            self
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}
