//! The broadcast interface the coordinator sends through.
//!
//! The coordinator decides *who* gets an event; an implementation of
//! [`Broadcaster`] (the gateway's connection hub) knows *how* to reach
//! them.

use codeshare_protocol::{RoomId, ServerEvent};
use codeshare_transport::ConnectionId;

/// Delivery to one connection, a room's broadcast group, or a group
/// minus one member.
///
/// Sends are fire-and-forget: a connection whose outbound side is gone
/// is skipped silently. A broadcast group is the set of connections
/// subscribed to a room id.
pub trait Broadcaster: Send + 'static {
    /// Adds `conn` to the room's broadcast group.
    fn subscribe(&mut self, room: &RoomId, conn: ConnectionId);

    /// Removes `conn` from the room's broadcast group.
    fn unsubscribe(&mut self, room: &RoomId, conn: ConnectionId);

    /// Drops the room's broadcast group entirely.
    fn dissolve(&mut self, room: &RoomId);

    /// Unicast.
    fn send_to(&self, conn: ConnectionId, event: ServerEvent);

    /// Multicast to every member of the room's group.
    fn send_to_room(&self, room: &RoomId, event: ServerEvent);

    /// Multicast to every member of the room's group except `except`.
    fn send_to_room_except(
        &self,
        room: &RoomId,
        except: ConnectionId,
        event: ServerEvent,
    );
}
