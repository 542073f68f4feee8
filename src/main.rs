//! SNS subscription receiver.
//!
//! ```text
//!     SNS ──POST──▶ ┌──────────────────────────────────────────────┐
//!                   │ request id → trace → timeout                 │
//!                   │   → content-type override (text → json)      │
//!                   │   → confirm middleware ──GET SubscribeURL──▶ │──▶ sns.<region>.amazonaws.com
//!                   │   → notification handler                     │
//!                   └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use sns_confirm::config::{load_config, ReceiverConfig};
use sns_confirm::lifecycle::signals::wait_for_signal;
use sns_confirm::observability::{logging, metrics};
use sns_confirm::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "sns-receiver")]
#[command(about = "HTTP endpoint that confirms AWS SNS subscriptions", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ReceiverConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("sns-receiver v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoint = %config.endpoint.path,
        request_timeout_secs = config.timeouts.request_secs,
        fetch_timeout_secs = ?config.confirm.fetch_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Arc::new(Shutdown::new());
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal(&signal_shutdown).await;
    });

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
