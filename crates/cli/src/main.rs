use clap::{Parser, Subcommand};
use iterdns_domain::{CliOverrides, RecordType, ResolverMode};
use tracing::info;

mod bootstrap;
mod di;
mod lookup;
mod server;

#[derive(Parser)]
#[command(name = "iterdns")]
#[command(version)]
#[command(about = "iterdns - iterative DNS resolver and caching UDP server")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long, global = true)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long, global = true)]
    bind: Option<String>,

    /// Seed server (root or upstream) as IP:PORT
    #[arg(short = 's', long, global = true)]
    seed: Option<String>,

    /// Resolver mode (iterative, recursive)
    #[arg(short = 'm', long, global = true)]
    mode: Option<ResolverMode>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve DNS queries over UDP
    Serve,

    /// Resolve a single name and print the result
    Lookup {
        /// Domain name to resolve
        name: String,

        /// Record type (A, NS, CNAME, MX, TXT)
        #[arg(short = 't', long = "type", default_value = "A")]
        record_type: RecordType,

        /// Ask the seed server to recurse instead of walking referrals
        #[arg(short = 'r', long)]
        recursive: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.port,
        bind_address: cli.bind.clone(),
        seed_server: cli.seed.clone(),
        mode: cli.mode,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    match cli.command {
        Command::Serve => {
            info!("Starting iterdns v{}", env!("CARGO_PKG_VERSION"));

            let services = di::DnsServices::new(&config)?;
            server::start_cache_purge(services.cache.clone(), config.cache.purge_interval());
            server::start_dns_server(&config.server, services.handler).await?;
        }
        Command::Lookup {
            name,
            record_type,
            recursive,
        } => {
            let mode = if recursive {
                ResolverMode::Recursive
            } else {
                config.resolver.mode
            };
            let resolver = di::build_resolver(&config.resolver, mode)?;
            lookup::run(resolver.as_ref(), &name, record_type).await?;
        }
    }

    Ok(())
}
