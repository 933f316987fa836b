//! Trade-request relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin agrirelay-server
//! cargo run --bin agrirelay-server -- --host 127.0.0.1 --port 4000
//! PORT=5000 cargo run --bin agrirelay-server
//! ```

use std::sync::Arc;

use agrirelay_server::{
    config::{Args, Config},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRegistry,
    },
    ui::{AppState, Server},
};
use agrirelay_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = Config::from(Args::parse());

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. AppState (UseCases)
    // 4. Server

    // 1. Create Registry (in-memory)
    let registry = Arc::new(InMemoryConnectionRegistry::new(Arc::new(SystemClock)));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Wire the use cases
    let state = AppState::new(registry, message_pusher);

    // 4. Create and run the server
    if let Err(e) = Server::new(state).run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
