//! The gateway: connection records plus the room coordinator.
//!
//! The server keeps one `Gateway` behind a single lock and applies every
//! inbound event while holding it. Nothing in here awaits, so the lock
//! is held only for the in-memory mutation and the queue pushes.

use std::collections::HashMap;

use codeshare_protocol::{ClientEvent, RoomId};
use codeshare_room::{
    Assignment, ConnectionRecord, RoomCoordinator, RoomError, RoomInfo,
    RoomRegistry,
};
use codeshare_transport::ConnectionId;

use crate::hub::{ConnectionHub, Outbound};

/// Owns the per-connection records and routes events to the coordinator.
pub struct Gateway {
    coordinator: RoomCoordinator<ConnectionHub>,
    records: HashMap<ConnectionId, ConnectionRecord>,
}

impl Gateway {
    /// A gateway with an empty room registry.
    pub fn new() -> Self {
        Self {
            coordinator: RoomCoordinator::new(
                RoomRegistry::new(),
                ConnectionHub::new(),
            ),
            records: HashMap::new(),
        }
    }

    /// Registers a newly accepted connection and its outbound queue.
    pub fn connect(&mut self, conn: ConnectionId, outbound: Outbound) {
        self.coordinator.broadcaster_mut().register(conn, outbound);
        self.records.insert(conn, ConnectionRecord::new(conn));
        tracing::debug!(%conn, "connection registered");
    }

    /// Applies one client event.
    ///
    /// Code and chat events go to every room the connection has joined;
    /// before any join they are dropped. Returns the assignment for a
    /// join, `None` otherwise.
    pub fn dispatch(
        &mut self,
        conn: ConnectionId,
        event: ClientEvent,
    ) -> Option<Assignment> {
        let Some(record) = self.records.get_mut(&conn) else {
            tracing::debug!(%conn, "event from unregistered connection");
            return None;
        };

        match event {
            ClientEvent::JoinRoom { room_id } => {
                let assignment = self.coordinator.join(&room_id, record);
                if let Ok(info) = self.coordinator.room_info(&room_id) {
                    tracing::debug!(
                        room_id = %info.room_id,
                        students = info.student_count,
                        has_code = info.has_code,
                        "room status"
                    );
                }
                Some(assignment)
            }
            ClientEvent::CodeChange { code } => {
                let rooms = self.coordinator.broadcaster().rooms_of(conn);
                if rooms.is_empty() {
                    tracing::debug!(%conn, "code change before join ignored");
                }
                for room_id in rooms {
                    self.coordinator.code_change(&room_id, conn, code.clone());
                }
                None
            }
            ClientEvent::ChatMessage { message } => {
                let rooms = self.coordinator.broadcaster().rooms_of(conn);
                if rooms.is_empty() {
                    tracing::debug!(%conn, "chat before join ignored");
                }
                for room_id in rooms {
                    self.coordinator
                        .chat_message(&room_id, record, message.clone());
                }
                None
            }
        }
    }

    /// Runs disconnect cleanup for every joined room, then forgets the
    /// connection.
    pub fn disconnect(&mut self, conn: ConnectionId) {
        for room_id in self.coordinator.broadcaster().rooms_of(conn) {
            self.coordinator.disconnect(&room_id, conn);
        }
        self.coordinator.broadcaster_mut().unregister(conn);
        self.records.remove(&conn);
        tracing::debug!(%conn, "connection released");
    }

    /// Metadata of one live room. A read-only query; it never creates
    /// the room.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if the room does not exist.
    pub fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RoomError> {
        self.coordinator.room_info(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.coordinator.room_count()
    }

    pub fn connection_count(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, conn: ConnectionId) -> Option<&ConnectionRecord> {
        self.records.get(&conn)
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}
