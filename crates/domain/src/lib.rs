//! iterdns domain layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod dns_request;
pub mod errors;
pub mod response_code;

pub use config::{CliOverrides, Config, ConfigError, ResolverMode};
pub use dns_query::DnsQuery;
pub use dns_record::{RecordType, CLASS_IN};
pub use dns_request::DnsRequest;
pub use errors::DomainError;
pub use response_code::ResponseCode;
