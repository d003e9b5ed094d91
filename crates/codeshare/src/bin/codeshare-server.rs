//! Codeshare server binary.
//!
//! ```bash
//! cargo run -p codeshare --bin codeshare-server -- --ws-addr 0.0.0.0:5001
//! ```
//! Then connect a WebSocket client to `ws://localhost:5001` and fetch
//! code blocks from `http://localhost:5002/api/codeblocks`.

use std::path::PathBuf;

use clap::Parser;
use codeshare::prelude::*;
use codeshare::{DEFAULT_HTTP_ADDR, DEFAULT_WS_ADDR};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "codeshare-server", about = "Realtime collaborative code-editing server")]
struct Cli {
    /// WebSocket listen address.
    #[arg(long, env = "CODESHARE_WS_ADDR", default_value = DEFAULT_WS_ADDR)]
    ws_addr: String,

    /// Catalog HTTP listen address.
    #[arg(long, env = "CODESHARE_HTTP_ADDR", default_value = DEFAULT_HTTP_ADDR)]
    http_addr: String,

    /// JSON file of code blocks; the built-in set is served without it.
    #[arg(long = "catalog", env = "CODESHARE_CATALOG")]
    catalog_path: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            ws_addr: self.ws_addr,
            http_addr: self.http_addr,
            catalog_path: self.catalog_path,
        }
    }
}

fn init_tracing(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let server = CodeshareServer::builder()
        .config(cli.into_config())
        .build()
        .await?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        ws = %server.ws_addr()?,
        http = %server.http_addr()?,
        "codeshare starting"
    );

    server.run().await?;
    Ok(())
}
