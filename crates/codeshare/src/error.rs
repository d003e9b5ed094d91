//! Unified error type for the Codeshare server.

use codeshare_catalog::CatalogError;
use codeshare_transport::TransportError;

/// Top-level error wrapping the sub-crate errors that can stop the
/// server from starting.
///
/// Per-connection failures never surface here: they end that
/// connection and are logged.
#[derive(Debug, thiserror::Error)]
pub enum CodeshareError {
    /// Binding the WebSocket listener failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The code-block catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Binding or serving the HTTP listener failed.
    #[error("http server: {0}")]
    Io(#[from] std::io::Error),
}
