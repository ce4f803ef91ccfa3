use super::dns_record::CLASS_IN;
use super::RecordType;
use std::sync::Arc;

/// A single question to be resolved: name, type and class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub record_class: u16,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            record_class: CLASS_IN,
        }
    }

    pub fn with_class(mut self, record_class: u16) -> Self {
        self.record_class = record_class;
        self
    }
}
