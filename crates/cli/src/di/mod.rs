mod dns;

pub use dns::{build_resolver, DnsServices};
