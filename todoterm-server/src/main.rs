//! `todoterm-server` -- in-memory `/todos` REST server.
//!
//! A development backend for the `todoterm` client. Tasks live in memory
//! and are lost on exit.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 127.0.0.1:3000
//! cargo run --bin todoterm-server
//!
//! # Run on a custom address
//! cargo run --bin todoterm-server -- --bind 0.0.0.0:8080
//! ```

use std::sync::Arc;

use clap::Parser;
use todoterm_proto::{TaskFields, UserId};
use todoterm_server::config::{ServerCliArgs, ServerConfig};
use todoterm_server::server;
use todoterm_server::store::TodoStore;

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

    tracing::info!(addr = %config.bind_addr, "starting todoterm server");

    let store = Arc::new(TodoStore::new());
    let owner = UserId::new(config.seed_user_id);
    for title in &config.seed_titles {
        store
            .create(TaskFields {
                title: title.clone(),
                completed: false,
                user_id: owner,
            })
            .await;
    }

    match server::start_server_with_store(&config.bind_addr, store).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "todo server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "todo server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start todo server");
            std::process::exit(1);
        }
    }
}
