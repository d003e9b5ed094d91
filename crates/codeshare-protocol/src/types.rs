//! Wire types: everything that travels between a client and the server.
//!
//! Every frame is a JSON object of the form
//! `{ "event": "<name>", "data": { ... } }`. The event names and payload
//! field names are camelCase because browser clients consume them
//! directly.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Client-chosen room key.
///
/// Arbitrary string, case-sensitive, never validated. Serialized as a
/// plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps a raw room key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the room key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The role a participant holds within a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// First participant of a room; their departure ends the session.
    Mentor,
    /// Any other participant.
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mentor => f.write_str("mentor"),
            Self::Student => f.write_str("student"),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientEvent: client → server
// ---------------------------------------------------------------------------

/// Events a client may send.
///
/// A frame missing a required field, carrying an unknown `event` name,
/// or with a wrongly typed field does not decode, and the gateway drops
/// it without touching room state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Join (or lazily create) a room.
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: RoomId,
    },

    /// Replace the room's shared document.
    CodeChange { code: String },

    /// Post a chat line to the room.
    ChatMessage { message: String },
}

impl ClientEvent {
    /// The wire name of this event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "joinRoom",
            Self::CodeChange { .. } => "codeChange",
            Self::ChatMessage { .. } => "chatMessage",
        }
    }
}

// ---------------------------------------------------------------------------
// ServerEvent: server → client
// ---------------------------------------------------------------------------

/// Events the server emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Unicast to a joiner: the role and display name it was given.
    RoleAssigned {
        role: Role,
        #[serde(rename = "userName")]
        user_name: String,
    },

    /// The room's current document. Unicast on join, or broadcast to
    /// everyone but the editor on change.
    UpdateCode { code: String },

    /// Number of students currently in the room.
    StudentCount { count: usize },

    /// A chat line, attributed to the sender's display name.
    ChatMessage { sender: String, message: String },

    /// The mentor disconnected and the room is gone.
    MentorLeft {},
}

impl ServerEvent {
    /// The wire name of this event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoleAssigned { .. } => "roleAssigned",
            Self::UpdateCode { .. } => "updateCode",
            Self::StudentCount { .. } => "studentCount",
            Self::ChatMessage { .. } => "chatMessage",
            Self::MentorLeft {} => "mentorLeft",
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
