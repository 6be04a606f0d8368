//! tcpterm entry point.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use tcpterm_client::{ManagerConfig, TcpConnectionManager};
use tcpterm_tui::{Dispatcher, TerminalDriver, logging};

/// Terminal client for line-oriented TCP servers
#[derive(Parser, Debug)]
#[command(name = "tcpterm")]
#[command(about = "Send lines to a TCP server and read its replies")]
#[command(version)]
struct Args {
    /// Target dialed when the prompt is submitted empty
    #[arg(short, long, default_value = "localhost:8080")]
    target: String,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Directory for log files (default: <tmp>/tcpterm)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_dir = args.log_dir.unwrap_or_else(logging::default_log_dir);
    let _guard = logging::init(&log_dir, &args.log_level)?;

    let config = ManagerConfig {
        connect_timeout: Duration::from_millis(args.connect_timeout_ms),
        ..Default::default()
    };
    let manager = TcpConnectionManager::new(config);
    tracing::info!(
        default_target = %args.target,
        timeout = ?manager.config().connect_timeout,
        reply_capacity = manager.config().reply_capacity,
        "configured"
    );

    let driver = TerminalDriver::new(args.target)?;
    let mut dispatcher = Dispatcher::new(driver, manager);

    dispatcher.run().await?;
    Ok(())
}
