use async_trait::async_trait;
use iterdns_application::ports::{
    DnsResolution, DnsResolver, ResolutionOutcome, ResponseCachePort,
};
use iterdns_domain::{DnsQuery, DomainError, RecordType};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// A header-only response with the given id and rcode.
pub fn response_bytes(id: u16, rcode: u8) -> Vec<u8> {
    let mut bytes = vec![0u8; 12];
    bytes[0..2].copy_from_slice(&id.to_be_bytes());
    bytes[2] = 0x80;
    bytes[3] = rcode;
    bytes
}

pub struct MockDnsResolver {
    responses: RwLock<HashMap<String, Vec<u8>>>,
    error_responses: RwLock<HashMap<String, DomainError>>,
    calls: AtomicUsize,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            error_responses: RwLock::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_response(&self, domain: &str, bytes: Vec<u8>) {
        self.responses
            .write()
            .unwrap()
            .insert(domain.to_string(), bytes);
    }

    pub fn set_response_error(&self, domain: &str, error: DomainError) {
        self.error_responses
            .write()
            .unwrap()
            .insert(domain.to_string(), error);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self
            .error_responses
            .read()
            .unwrap()
            .get(query.domain.as_ref())
            .cloned()
        {
            return Err(err);
        }

        let responses = self.responses.read().unwrap();
        let bytes = responses
            .get(query.domain.as_ref())
            .cloned()
            .ok_or_else(|| DomainError::NoReferral {
                server: "mock".to_string(),
            })?;
        let outcome = ResolutionOutcome::from_response(&bytes);
        Ok(DnsResolution::new(bytes, outcome).with_upstream("127.0.0.1:53".parse().unwrap(), 1))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[derive(Default)]
pub struct MockResponseCache {
    entries: RwLock<HashMap<(String, RecordType, u16), Arc<[u8]>>>,
}

impl MockResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn contains(&self, query: &DnsQuery) -> bool {
        self.get(query).is_some()
    }
}

impl ResponseCachePort for MockResponseCache {
    fn get(&self, query: &DnsQuery) -> Option<Arc<[u8]>> {
        self.entries
            .read()
            .unwrap()
            .get(&(query.domain.to_string(), query.record_type, query.record_class))
            .cloned()
    }

    fn put(&self, query: &DnsQuery, bytes: Arc<[u8]>) {
        self.entries.write().unwrap().insert(
            (query.domain.to_string(), query.record_type, query.record_class),
            bytes,
        );
    }
}
