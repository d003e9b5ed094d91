//! `CodeshareServer` builder and server loop.
//!
//! This is the entry point for running a Codeshare server. It ties the
//! layers together: transport → protocol → gateway → room coordinator,
//! with the catalog router served next to it on its own port.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use codeshare_catalog::{router, CodeBlockStore, MemoryCatalog};
use codeshare_protocol::{Codec, JsonCodec};
use codeshare_transport::{Transport, WebSocketTransport};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::gateway::Gateway;
use crate::handler::handle_connection;
use crate::CodeshareError;

/// Default WebSocket listen address.
pub const DEFAULT_WS_ADDR: &str = "0.0.0.0:5001";
/// Default HTTP listen address for the catalog.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:5002";

/// Shared server state passed to each connection handler task.
///
/// Every room mutation happens while `gateway` is locked.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) gateway: Mutex<Gateway>,
    pub(crate) codec: C,
}

/// Listen addresses and catalog source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub ws_addr: String,
    pub http_addr: String,
    /// JSON file of code blocks. `None` serves the built-in seed set.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ws_addr: DEFAULT_WS_ADDR.to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            catalog_path: None,
        }
    }
}

/// Builder for configuring and starting a Codeshare server.
///
/// # Example
///
/// ```rust,no_run
/// use codeshare::prelude::*;
///
/// # async fn start() -> Result<(), CodeshareError> {
/// let server = CodeshareServer::builder()
///     .ws_addr("127.0.0.1:5001")
///     .http_addr("127.0.0.1:5002")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct CodeshareServerBuilder {
    config: ServerConfig,
    store: Option<Arc<dyn CodeBlockStore>>,
}

impl CodeshareServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            store: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ws_addr(mut self, addr: &str) -> Self {
        self.config.ws_addr = addr.to_string();
        self
    }

    pub fn http_addr(mut self, addr: &str) -> Self {
        self.config.http_addr = addr.to_string();
        self
    }

    /// Loads the catalog from a JSON file instead of the seed set.
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.catalog_path = Some(path.into());
        self
    }

    /// Serves a caller-provided store. Takes precedence over
    /// `catalog_path`.
    pub fn store(mut self, store: Arc<dyn CodeBlockStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Binds both listeners and loads the catalog.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    ///
    /// # Errors
    /// Fails if either address cannot be bound or the catalog file
    /// cannot be read.
    pub async fn build(self) -> Result<CodeshareServer<JsonCodec>, CodeshareError> {
        let store = match (self.store, &self.config.catalog_path) {
            (Some(store), _) => store,
            (None, Some(path)) => {
                let catalog = MemoryCatalog::from_json_file(path)?;
                tracing::info!(path = %path.display(), blocks = catalog.len(), "catalog loaded");
                Arc::new(catalog)
            }
            (None, None) => Arc::new(MemoryCatalog::seeded()),
        };

        let transport = WebSocketTransport::bind(&self.config.ws_addr).await?;
        let http = TcpListener::bind(&self.config.http_addr).await?;
        tracing::info!(addr = %self.config.http_addr, "HTTP listener bound");

        let state = Arc::new(ServerState {
            gateway: Mutex::new(Gateway::new()),
            codec: JsonCodec,
        });

        Ok(CodeshareServer {
            transport,
            http,
            store,
            state,
        })
    }
}

impl Default for CodeshareServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Codeshare server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct CodeshareServer<C: Codec> {
    transport: WebSocketTransport,
    http: TcpListener,
    store: Arc<dyn CodeBlockStore>,
    state: Arc<ServerState<C>>,
}

impl CodeshareServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> CodeshareServerBuilder {
        CodeshareServerBuilder::new()
    }
}

impl<C: Codec> CodeshareServer<C> {
    /// Address the WebSocket listener is bound to.
    pub fn ws_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Address the catalog HTTP listener is bound to.
    pub fn http_addr(&self) -> std::io::Result<SocketAddr> {
        self.http.local_addr()
    }

    /// Serves the catalog and runs the WebSocket accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), CodeshareError> {
        let app = router(self.store);
        let http = self.http;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(http, app).await {
                tracing::error!(error = %e, "HTTP server stopped");
            }
        });

        tracing::info!("Codeshare server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(handle_connection(conn, state));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
