//! Wire protocol for Codeshare.
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`RoomId`], [`Role`]):
//!   the events that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those events are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (bytes) → Protocol (events) → Room coordinator
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientEvent, Role, RoomId, ServerEvent};
