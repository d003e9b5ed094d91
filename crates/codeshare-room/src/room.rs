//! Per-room state and the role-assignment rule.

use std::collections::HashMap;

use codeshare_protocol::{Role, RoomId};
use codeshare_transport::ConnectionId;

/// Display name given to every mentor.
pub const MENTOR_NAME: &str = "Mentor";

/// Chat sender name used when the connection never completed a join.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Result of assigning a role to a joining connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The role the connection now holds in the room.
    pub role: Role,
    /// `"Mentor"` or `"Student N"`.
    pub display_name: String,
}

/// One collaboration session.
#[derive(Debug, Clone)]
pub struct Room {
    mentor: Option<ConnectionId>,
    students: HashMap<ConnectionId, String>,
    /// Starts at 1 and only ever goes up, even as students leave.
    next_student_number: u64,
    current_code: Option<String>,
}

impl Room {
    pub(crate) fn new() -> Self {
        Self {
            mentor: None,
            students: HashMap::new(),
            next_student_number: 1,
            current_code: None,
        }
    }

    /// First joiner becomes mentor; everyone after is the next student.
    ///
    /// Only an empty mentor seat makes a mentor. A repeat join by anyone,
    /// the mentor included, draws a fresh student number; the mentor
    /// keeps the seat, so their disconnect still ends the room.
    pub(crate) fn assign(&mut self, conn: ConnectionId) -> Assignment {
        match self.mentor {
            None => {
                self.mentor = Some(conn);
                Assignment {
                    role: Role::Mentor,
                    display_name: MENTOR_NAME.to_owned(),
                }
            }
            Some(_) => {
                let display_name = format!("Student {}", self.next_student_number);
                self.next_student_number += 1;
                self.students.insert(conn, display_name.clone());
                Assignment {
                    role: Role::Student,
                    display_name,
                }
            }
        }
    }

    /// Removes a student. Returns `false` if `conn` was not one.
    pub(crate) fn remove_student(&mut self, conn: ConnectionId) -> bool {
        self.students.remove(&conn).is_some()
    }

    pub(crate) fn set_code(&mut self, code: String) {
        self.current_code = Some(code);
    }

    /// The connection holding the mentor role.
    pub fn mentor(&self) -> Option<ConnectionId> {
        self.mentor
    }

    pub fn is_mentor(&self, conn: ConnectionId) -> bool {
        self.mentor == Some(conn)
    }

    /// Display name of a current student.
    pub fn student_name(&self, conn: ConnectionId) -> Option<&str> {
        self.students.get(&conn).map(String::as_str)
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// The number the next student will be given.
    pub fn next_student_number(&self) -> u64 {
        self.next_student_number
    }

    /// Latest shared document, `None` until the first edit.
    pub fn current_code(&self) -> Option<&str> {
        self.current_code.as_deref()
    }
}

/// A snapshot of room metadata, for status queries and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub mentor: Option<ConnectionId>,
    pub student_count: usize,
    pub has_code: bool,
}
