//! Token-authorizing edge gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────────────┐
//!                        │                      GATEWAY                          │
//!                        │                                                       │
//!   POST /               │  ┌──────────┐   ┌────────────┐   ┌─────────────┐     │
//!   x-authorization-     ┼─▶│ identity │──▶│ authorizer │──▶│ enforcement │     │
//!   header: <token>      │  │  check   │   │ + context  │   │  (policy)   │     │
//!                        │  └──────────┘   └────────────┘   └──────┬──────┘     │
//!                        │                                         ▼            │
//!                        │                                 ┌──────────────┐     │
//!                        │                                 │   request    │     │
//!                        │                                 │  transform   │     │
//!                        │                                 └──────┬───────┘     │
//!                        │                                        ▼             │
//!   {state, greeting |   │  ┌──────────┐                  ┌──────────────┐      │
//!    message}            ◀──│ response │◀─────────────────│   backend    │◀─────┼── greeting
//!                        │  │transform │                  │   invoker    │      │   or HTTP
//!                        │  └──────────┘                  └──────────────┘      │
//!                        │                                                       │
//!                        │  config (+ hot reload) · logging · metrics · lifecycle │
//!                        └───────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use token_gateway::config::watcher::ConfigWatcher;
use token_gateway::lifecycle::{signals, startup, Shutdown};
use token_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "token-gateway")]
#[command(about = "Token-authorizing edge gateway", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = startup::load_startup_config(args.config.as_deref())?;
    startup::init_observability(&config);

    tracing::info!("token-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        api = %config.api.name,
        method_arn = %config.api.method_arn(),
        backend = ?config.backend.kind,
        backend_timeout_ms = config.backend.timeout_ms,
        "Configuration loaded"
    );

    // Hot reload; the watcher must stay alive for the lifetime of the server.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config)?;

    tokio::spawn(async move {
        signals::shutdown_on_signal(&shutdown).await;
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
