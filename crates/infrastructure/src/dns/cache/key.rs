use compact_str::CompactString;
use iterdns_domain::{DnsQuery, RecordType};

/// Cache key: normalized name, type and class.
///
/// The name is lower-cased and stored without a trailing dot so that
/// `Example.COM.` and `example.com` share an entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub domain: CompactString,
    pub record_type: RecordType,
    pub record_class: u16,
}

impl CacheKey {
    #[inline]
    pub fn new(domain: &str, record_type: RecordType, record_class: u16) -> Self {
        let trimmed = domain.strip_suffix('.').unwrap_or(domain);
        Self {
            domain: trimmed.chars().map(|c| c.to_ascii_lowercase()).collect(),
            record_type,
            record_class,
        }
    }

    #[inline]
    pub fn from_query(query: &DnsQuery) -> Self {
        Self::new(&query.domain, query.record_type, query.record_class)
    }
}
