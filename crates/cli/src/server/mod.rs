pub mod dns;

pub use dns::{start_cache_purge, start_dns_server};
