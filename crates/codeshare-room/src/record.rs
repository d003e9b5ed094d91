//! Per-connection record: who a connection is once it has joined.

use codeshare_protocol::Role;
use codeshare_transport::ConnectionId;

use crate::Assignment;

/// What the server knows about one live connection.
///
/// Owned by the gateway and looked up by id on every event. The
/// coordinator writes the role and display name on join and reads the
/// name back for chat attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    id: ConnectionId,
    display_name: Option<String>,
    role: Option<Role>,
}

impl ConnectionRecord {
    /// A fresh record with no role yet.
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            display_name: None,
            role: None,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// `None` until the connection's first join completes.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Records the latest assignment. A later join overwrites an earlier one.
    pub(crate) fn apply(&mut self, assignment: &Assignment) {
        self.role = Some(assignment.role);
        self.display_name = Some(assignment.display_name.clone());
    }
}
