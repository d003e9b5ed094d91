//! Room coordination for Codeshare.
//!
//! A room is created by its first join; that joiner becomes the mentor and
//! everyone after is a numbered student. Code edits and chat lines are
//! relayed to the room, late joiners get the latest code, and the room is
//! torn down the moment its mentor disconnects.
//!
//! # Key types
//!
//! - [`RoomCoordinator`]: applies join/code/chat/disconnect events
//! - [`RoomRegistry`]: room id → [`Room`] state, injected at construction
//! - [`Broadcaster`]: how the coordinator reaches connections
//! - [`ConnectionRecord`]: per-connection role and display name

mod broadcast;
mod coordinator;
mod error;
mod record;
mod registry;
mod room;

pub use broadcast::Broadcaster;
pub use coordinator::RoomCoordinator;
pub use error::RoomError;
pub use record::ConnectionRecord;
pub use registry::RoomRegistry;
pub use room::{Assignment, Room, RoomInfo, MENTOR_NAME, UNKNOWN_SENDER};
