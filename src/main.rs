//! Employee portal server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ ┌──────────────────────────────────────────────────────┐
//!                     │  http (axum + tower-http: request id, trace, limits) │
//!                     └──────┬──────────────────┬──────────────────┬─────────┘
//!                            │ POST /           │ POST /new_user   │ GET /menu*
//!                            ▼                  ▼                  ▼
//!                     ┌────────────┐     ┌────────────┐     ┌────────────┐
//!                     │  lockout   │     │  password  │     │   access   │
//!                     │   guard    │     │   policy   │     │   policy   │
//!                     └─────┬──────┘     └─────┬──────┘     └─────┬──────┘
//!                           ▼                  ▼                  │
//!                     ┌─────────────────────────────┐             │
//!                     │ authenticator (Argon2id)    │             │
//!                     └─────────────┬───────────────┘             │
//!                                   ▼                             ▼
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │  credential store (DashMap, CSV source)              │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use employee_portal::config::load_or_default;
use employee_portal::lifecycle::signals::wait_for_signal;
use employee_portal::observability::{logging, metrics};
use employee_portal::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "employee-portal")]
#[command(about = "Internal employee portal", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability);

    tracing::info!("employee-portal v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        credentials = %config.credentials.path,
        lockout_scope = ?config.lockout.scope,
        max_attempts = config.lockout.max_attempts,
        cooldown_secs = config.lockout.cooldown_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
