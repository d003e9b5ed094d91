//! The connection hub: per-connection outbound queues and room groups.
//!
//! This is the gateway's implementation of [`Broadcaster`]. Sends only
//! push onto unbounded queues, so they never wait on the network; each
//! connection's writer task drains its queue.

use std::collections::{HashMap, HashSet};

use codeshare_protocol::{RoomId, ServerEvent};
use codeshare_room::Broadcaster;
use codeshare_transport::ConnectionId;
use tokio::sync::mpsc;

/// Queue feeding one connection's writer task.
pub type Outbound = mpsc::UnboundedSender<ServerEvent>;

/// Tracks live connections and which rooms each is subscribed to.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    outbound: HashMap<ConnectionId, Outbound>,
    /// Room → members. Empty groups are removed.
    groups: HashMap<RoomId, HashSet<ConnectionId>>,
    /// Member → rooms, kept in sync with `groups`.
    memberships: HashMap<ConnectionId, HashSet<RoomId>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection's outbound queue.
    pub fn register(&mut self, conn: ConnectionId, outbound: Outbound) {
        self.outbound.insert(conn, outbound);
    }

    /// Drops a connection's queue, which ends its writer task.
    ///
    /// Room subscriptions must already have been released through the
    /// coordinator; any left over are cleared here.
    pub fn unregister(&mut self, conn: ConnectionId) {
        self.outbound.remove(&conn);
        if let Some(rooms) = self.memberships.remove(&conn) {
            for room in rooms {
                self.remove_from_group(&room, conn);
            }
        }
    }

    /// Rooms the connection is subscribed to, sorted for stable
    /// processing order.
    pub fn rooms_of(&self, conn: ConnectionId) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self
            .memberships
            .get(&conn)
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    /// Number of connections subscribed to a room.
    pub fn group_size(&self, room: &RoomId) -> usize {
        self.groups.get(room).map_or(0, HashSet::len)
    }

    pub fn connection_count(&self) -> usize {
        self.outbound.len()
    }

    fn remove_from_group(&mut self, room: &RoomId, conn: ConnectionId) {
        if let Some(group) = self.groups.get_mut(room) {
            group.remove(&conn);
            if group.is_empty() {
                self.groups.remove(room);
            }
        }
    }

    fn deliver(&self, conn: ConnectionId, event: ServerEvent) {
        if let Some(tx) = self.outbound.get(&conn) {
            // Receiver gone means the writer already stopped.
            let _ = tx.send(event);
        }
    }
}

impl Broadcaster for ConnectionHub {
    fn subscribe(&mut self, room: &RoomId, conn: ConnectionId) {
        self.groups.entry(room.clone()).or_default().insert(conn);
        self.memberships
            .entry(conn)
            .or_default()
            .insert(room.clone());
    }

    fn unsubscribe(&mut self, room: &RoomId, conn: ConnectionId) {
        self.remove_from_group(room, conn);
        if let Some(rooms) = self.memberships.get_mut(&conn) {
            rooms.remove(room);
            if rooms.is_empty() {
                self.memberships.remove(&conn);
            }
        }
    }

    fn dissolve(&mut self, room: &RoomId) {
        let Some(members) = self.groups.remove(room) else {
            return;
        };
        for conn in members {
            if let Some(rooms) = self.memberships.get_mut(&conn) {
                rooms.remove(room);
                if rooms.is_empty() {
                    self.memberships.remove(&conn);
                }
            }
        }
    }

    fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        self.deliver(conn, event);
    }

    fn send_to_room(&self, room: &RoomId, event: ServerEvent) {
        if let Some(group) = self.groups.get(room) {
            for conn in group {
                self.deliver(*conn, event.clone());
            }
        }
    }

    fn send_to_room_except(
        &self,
        room: &RoomId,
        except: ConnectionId,
        event: ServerEvent,
    ) {
        if let Some(group) = self.groups.get(room) {
            for conn in group.iter().filter(|c| **c != except) {
                self.deliver(*conn, event.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn hub_with(ids: &[u64]) -> (ConnectionHub, Vec<mpsc::UnboundedReceiver<ServerEvent>>) {
        let mut hub = ConnectionHub::new();
        let mut receivers = Vec::new();
        for id in ids {
            let (tx, rx) = mpsc::unbounded_channel();
            hub.register(cid(*id), tx);
            receivers.push(rx);
        }
        (hub, receivers)
    }

    #[test]
    fn test_send_to_room_except_skips_sender() {
        let (mut hub, mut rx) = hub_with(&[1, 2, 3]);
        let room = RoomId::from("r1");
        for id in 1..=3 {
            hub.subscribe(&room, cid(id));
        }

        hub.send_to_room_except(&room, cid(2), ServerEvent::UpdateCode { code: "x".into() });

        assert!(rx[0].try_recv().is_ok());
        assert!(rx[1].try_recv().is_err());
        assert!(rx[2].try_recv().is_ok());
    }

    #[test]
    fn test_send_to_room_only_reaches_subscribers() {
        let (mut hub, mut rx) = hub_with(&[1, 2]);
        let room = RoomId::from("r1");
        hub.subscribe(&room, cid(1));

        hub.send_to_room(&room, ServerEvent::StudentCount { count: 0 });

        assert_eq!(rx[0].try_recv().unwrap(), ServerEvent::StudentCount { count: 0 });
        assert!(rx[1].try_recv().is_err());
    }

    #[test]
    fn test_unsubscribe_updates_both_indexes() {
        let (mut hub, _rx) = hub_with(&[1]);
        let room = RoomId::from("r1");
        hub.subscribe(&room, cid(1));
        assert_eq!(hub.rooms_of(cid(1)), vec![room.clone()]);

        hub.unsubscribe(&room, cid(1));

        assert!(hub.rooms_of(cid(1)).is_empty());
        assert_eq!(hub.group_size(&room), 0);
    }

    #[test]
    fn test_dissolve_clears_memberships() {
        let (mut hub, _rx) = hub_with(&[1, 2]);
        let r1 = RoomId::from("r1");
        let r2 = RoomId::from("r2");
        hub.subscribe(&r1, cid(1));
        hub.subscribe(&r1, cid(2));
        hub.subscribe(&r2, cid(2));

        hub.dissolve(&r1);

        assert_eq!(hub.group_size(&r1), 0);
        assert!(hub.rooms_of(cid(1)).is_empty());
        assert_eq!(hub.rooms_of(cid(2)), vec![r2]);
    }

    #[test]
    fn test_send_to_dropped_receiver_is_silent() {
        let (hub, rx) = hub_with(&[1]);
        drop(rx);
        hub.send_to(cid(1), ServerEvent::MentorLeft {});
        hub.send_to(cid(99), ServerEvent::MentorLeft {});
    }

    #[test]
    fn test_unregister_drops_queue_and_groups() {
        let (mut hub, mut rx) = hub_with(&[1]);
        let room = RoomId::from("r1");
        hub.subscribe(&room, cid(1));

        hub.unregister(cid(1));

        assert_eq!(hub.connection_count(), 0);
        assert_eq!(hub.group_size(&room), 0);
        assert!(rx[0].try_recv().is_err(), "sender dropped, queue closed");
    }
}
