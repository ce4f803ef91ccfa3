use iterdns_domain::Config;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

const WORKSPACE_TARGETS: [&str; 4] = [
    "iterdns",
    "iterdns_domain",
    "iterdns_application",
    "iterdns_infrastructure",
];

/// `RUST_LOG` wins; otherwise `logging.level` applies to the workspace crates.
pub fn init_logging(config: &Config) {
    let level = &config.logging.level;
    let default_directives = WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{}", default_directives)));

    registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
