use iterdns_application::ports::{DnsResolver, ResolutionOutcome};
use iterdns_domain::{DnsQuery, DomainError, RecordType};
use iterdns_infrastructure::dns::wire::{first_address, first_name, first_text, referrals};

/// Resolves `name` once and prints the typed result to stdout.
pub async fn run(
    resolver: &dyn DnsResolver,
    name: &str,
    record_type: RecordType,
) -> anyhow::Result<()> {
    let query = DnsQuery::new(name, record_type);
    let resolution = resolver.resolve(&query).await?;

    if let Some(server) = resolution.upstream_server {
        println!(
            ";; {} {} via {} ({}, {} hops)",
            name,
            record_type,
            server,
            resolver.name(),
            resolution.hops
        );
    }

    if resolution.outcome == ResolutionOutcome::NameError {
        println!("{}: NXDOMAIN", name);
        return Ok(());
    }

    match typed_answer(&resolution.bytes, record_type) {
        Ok(answer) => println!("{}", answer),
        Err(DomainError::NoMatchingAnswer(_)) => {
            println!("{}: no {} record in answer section", name, record_type);
            for referral in referrals(&resolution.bytes)? {
                println!("  referral {}", referral);
            }
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn typed_answer(bytes: &[u8], record_type: RecordType) -> Result<String, DomainError> {
    match record_type {
        RecordType::A => first_address(bytes).map(|addr| addr.to_string()),
        RecordType::TXT => first_text(bytes),
        RecordType::NS | RecordType::CNAME | RecordType::MX => first_name(bytes, record_type),
    }
}
