//! `Taskboard` reference server -- in-memory task CRUD service.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 127.0.0.1:8000
//! cargo run --bin taskboard-server
//!
//! # Run on custom address
//! cargo run --bin taskboard-server -- --bind 0.0.0.0:8080
//! ```

use clap::Parser;
use taskboard_server::config::{ServerCliArgs, ServerConfig};
use taskboard_server::server;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskboard server");

    match server::start_server(&config.bind_addr.to_string()).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "task service listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "task service task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start task service");
            std::process::exit(1);
        }
    }
}
