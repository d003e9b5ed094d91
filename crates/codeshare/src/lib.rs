//! # Codeshare
//!
//! Realtime collaborative code-editing session server.
//!
//! Clients connect over WebSocket and join a named room. The first to
//! join becomes the room's mentor; everyone after is a numbered student.
//! Code edits and chat are relayed to the rest of the room, late joiners
//! get the latest code, and the room ends when its mentor leaves. A
//! read-only catalog of starter code blocks is served over HTTP.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codeshare::prelude::*;
//!
//! # async fn start() -> Result<(), CodeshareError> {
//! let server = CodeshareServer::builder()
//!     .config(ServerConfig::default())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod gateway;
mod handler;
mod hub;
mod server;

pub use error::CodeshareError;
pub use gateway::Gateway;
pub use hub::{ConnectionHub, Outbound};
pub use server::{
    CodeshareServer, CodeshareServerBuilder, ServerConfig, DEFAULT_HTTP_ADDR,
    DEFAULT_WS_ADDR,
};

pub mod prelude {
    pub use crate::{
        CodeshareError, CodeshareServer, CodeshareServerBuilder, Gateway,
        ServerConfig,
    };
    pub use codeshare_catalog::{CodeBlock, CodeBlockStore, MemoryCatalog};
    pub use codeshare_protocol::{ClientEvent, Role, RoomId, ServerEvent};
}
