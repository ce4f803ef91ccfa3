pub mod iterative;
pub mod stub;

pub use iterative::IterativeResolver;
pub use stub::StubResolver;

use iterdns_application::ports::{DnsResolution, ResolutionOutcome};
use iterdns_domain::DomainError;
use std::net::SocketAddr;

/// Final response of a resolution together with where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedResponse {
    pub bytes: Vec<u8>,
    pub outcome: ResolutionOutcome,
    pub server: SocketAddr,
    pub hops: usize,
}

impl ResolvedResponse {
    /// The response bytes, or an error when the name does not exist.
    pub fn into_answer(self) -> Result<Vec<u8>, DomainError> {
        match self.outcome {
            ResolutionOutcome::Answered => Ok(self.bytes),
            ResolutionOutcome::NameError => Err(DomainError::UpstreamRcode(
                iterdns_domain::ResponseCode::NXDomain,
            )),
        }
    }
}

impl From<ResolvedResponse> for DnsResolution {
    fn from(resolved: ResolvedResponse) -> Self {
        DnsResolution::new(resolved.bytes, resolved.outcome)
            .with_upstream(resolved.server, resolved.hops)
    }
}

/// Rejects blank names and names containing control characters.
pub fn validate_domain_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidDomainName(
            "domain name is empty".to_string(),
        ));
    }
    if name.bytes().any(|b| b < 0x20) {
        return Err(DomainError::InvalidDomainName(format!(
            "domain name {:?} contains control characters",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_domain_name() {
        assert!(validate_domain_name("example.com").is_ok());
        assert!(validate_domain_name("").is_err());
        assert!(validate_domain_name("   ").is_err());
        assert!(validate_domain_name("exa\tmple.com").is_err());
        assert!(validate_domain_name("example.com\n").is_err());
        assert!(validate_domain_name("\u{0}").is_err());
    }
}
