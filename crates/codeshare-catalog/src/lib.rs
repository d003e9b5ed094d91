//! Read-only catalog of starter code blocks, served over HTTP.
//!
//! Independent of the room coordinator: rooms never consult it. Clients
//! fetch a block here and then join a room to edit it together.

mod error;
mod http;
mod store;

pub use error::CatalogError;
pub use http::router;
pub use store::{CodeBlock, CodeBlockStore, MemoryCatalog, NewCodeBlock};
