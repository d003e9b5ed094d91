//! Error types for the room layer.

use codeshare_protocol::RoomId;

/// Errors returned by room lookups.
///
/// The event operations on [`RoomCoordinator`](crate::RoomCoordinator)
/// never fail: a missing room is created on join and ignored otherwise.
/// Only the read-side queries report absence.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (never joined, or its mentor left).
    #[error("room {0} not found")]
    NotFound(RoomId),
}
