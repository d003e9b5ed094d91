//! The room registry: room id → room state.
//!
//! `RoomRegistry` is a plain `HashMap` wrapper and is not thread-safe by
//! itself. It is owned by one [`RoomCoordinator`](crate::RoomCoordinator),
//! and the server serializes access to that with a single lock.

use std::collections::HashMap;

use codeshare_protocol::RoomId;

use crate::{Room, RoomError, RoomInfo};

/// All live rooms. Empty at startup.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the room, creating it if this id is unseen.
    pub(crate) fn get_or_create(&mut self, room_id: &RoomId) -> &mut Room {
        self.rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!(%room_id, "room created");
            Room::new()
        })
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub(crate) fn get_mut(&mut self, room_id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    pub(crate) fn remove(&mut self, room_id: &RoomId) -> Option<Room> {
        self.rooms.remove(room_id)
    }

    /// Returns a metadata snapshot of one room.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if the room does not exist.
    pub fn info(&self, room_id: &RoomId) -> Result<RoomInfo, RoomError> {
        let room = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        Ok(RoomInfo {
            room_id: room_id.clone(),
            mentor: room.mentor(),
            student_count: room.student_count(),
            has_code: room.current_code().is_some(),
        })
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
