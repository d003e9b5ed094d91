//! The room coordinator: one operation per inbound event.
//!
//! Every operation is a synchronous in-memory mutation followed by
//! zero or more broadcasts. Callers must apply operations one at a time
//! (the server holds a lock around the coordinator); that ordering is
//! what keeps mentor assignment and student numbering race-free.

use codeshare_protocol::{RoomId, ServerEvent};
use codeshare_transport::ConnectionId;

use crate::{
    Assignment, Broadcaster, ConnectionRecord, Room, RoomError, RoomInfo,
    RoomRegistry, UNKNOWN_SENDER,
};

/// Owns the room registry and drives broadcasts for room events.
pub struct RoomCoordinator<B: Broadcaster> {
    registry: RoomRegistry,
    broadcaster: B,
}

impl<B: Broadcaster> RoomCoordinator<B> {
    /// Creates a coordinator over an injected registry and broadcaster.
    pub fn new(registry: RoomRegistry, broadcaster: B) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// Joins `record` to a room, creating the room if needed.
    ///
    /// The connection is subscribed to the room's broadcast group before
    /// anything is sent, so it receives its own `studentCount`. Emits, in
    /// order: `roleAssigned` (unicast), `updateCode` (unicast, only if the
    /// room already has code), `studentCount` (room-wide).
    pub fn join(
        &mut self,
        room_id: &RoomId,
        record: &mut ConnectionRecord,
    ) -> Assignment {
        let conn = record.id();
        self.broadcaster.subscribe(room_id, conn);

        let room = self.registry.get_or_create(room_id);
        let assignment = room.assign(conn);
        let snapshot = room.current_code().map(str::to_owned);
        let count = room.student_count();
        record.apply(&assignment);

        tracing::info!(
            %room_id,
            %conn,
            role = %assignment.role,
            name = %assignment.display_name,
            students = count,
            "role assigned"
        );

        self.broadcaster.send_to(
            conn,
            ServerEvent::RoleAssigned {
                role: assignment.role,
                user_name: assignment.display_name.clone(),
            },
        );
        if let Some(code) = snapshot {
            self.broadcaster
                .send_to(conn, ServerEvent::UpdateCode { code });
        }
        self.broadcaster
            .send_to_room(room_id, ServerEvent::StudentCount { count });

        assignment
    }

    /// Replaces the room's code and relays it to everyone but the sender.
    pub fn code_change(
        &mut self,
        room_id: &RoomId,
        conn: ConnectionId,
        code: String,
    ) {
        let Some(room) = self.registry.get_mut(room_id) else {
            tracing::debug!(%room_id, %conn, "code change for absent room ignored");
            return;
        };
        room.set_code(code.clone());
        tracing::debug!(%room_id, %conn, bytes = code.len(), "code updated");

        self.broadcaster.send_to_room_except(
            room_id,
            conn,
            ServerEvent::UpdateCode { code },
        );
    }

    /// Relays a chat line to the whole room, sender included.
    pub fn chat_message(
        &mut self,
        room_id: &RoomId,
        record: &ConnectionRecord,
        message: String,
    ) {
        if !self.registry.contains(room_id) {
            tracing::debug!(%room_id, conn = %record.id(), "chat for absent room ignored");
            return;
        }
        let sender = record.display_name().unwrap_or(UNKNOWN_SENDER).to_owned();
        tracing::debug!(%room_id, %sender, "chat message");

        self.broadcaster
            .send_to_room(room_id, ServerEvent::ChatMessage { sender, message });
    }

    /// Handles a connection leaving a room.
    ///
    /// The mentor leaving ends the room: remaining members get
    /// `mentorLeft`, the broadcast group is dissolved and the room is
    /// dropped. A student leaving triggers one `studentCount` to the
    /// members that remain.
    pub fn disconnect(&mut self, room_id: &RoomId, conn: ConnectionId) {
        self.broadcaster.unsubscribe(room_id, conn);

        let Some(room) = self.registry.get_mut(room_id) else {
            return;
        };

        if room.is_mentor(conn) {
            self.broadcaster
                .send_to_room(room_id, ServerEvent::MentorLeft {});
            self.broadcaster.dissolve(room_id);
            self.registry.remove(room_id);
            tracing::info!(%room_id, %conn, "mentor left, room destroyed");
            return;
        }

        if room.remove_student(conn) {
            let count = room.student_count();
            tracing::info!(%room_id, %conn, students = count, "student left");
            self.broadcaster
                .send_to_room(room_id, ServerEvent::StudentCount { count });
        }
    }

    /// Returns a live room, if any.
    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.registry.get(room_id)
    }

    /// Returns a metadata snapshot of one room.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if the room does not exist.
    pub fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RoomError> {
        self.registry.info(room_id)
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.registry.len()
    }

    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    pub fn broadcaster_mut(&mut self) -> &mut B {
        &mut self.broadcaster
    }
}
