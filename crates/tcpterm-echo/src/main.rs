//! tcpterm-echo entry point.

use clap::Parser;
use tcpterm_echo::{DEFAULT_BACKLOG, DEFAULT_BIND_ADDRESS, EchoConfig, EchoServer};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Echo server for the tcpterm client
#[derive(Parser, Debug)]
#[command(name = "tcpterm-echo")]
#[command(about = "Write every received byte back to its sender")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = DEFAULT_BIND_ADDRESS)]
    bind: String,

    /// Pending connections queued by the listener
    #[arg(long, default_value_t = DEFAULT_BACKLOG)]
    backlog: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = EchoConfig { bind_address: args.bind, backlog: args.backlog };
    let server = EchoServer::bind(&config)?;
    server.run().await?;

    Ok(())
}
