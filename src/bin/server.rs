//! Multi-room WebSocket chat server binary.
//!
//! Run with:
//! ```not_rust
//! CHAT__AUTH__TOKEN_KEY=some-secret cargo run --bin server
//! CHAT__AUTH__TOKEN_KEY=some-secret cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use chat_rooms_rs::common::logger::setup_logger;
use chat_rooms_rs::config::AppConfig;
use chat_rooms_rs::server::run_server;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Multi-room WebSocket chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to (overrides configuration)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port number to bind the server to (overrides configuration)
    #[arg(short = 'p', long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    setup_logger(&config.log);

    if let Err(e) = run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
