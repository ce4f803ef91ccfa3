//! iterdns infrastructure: wire codec, transport, resolvers, cache and server
pub mod dns;
