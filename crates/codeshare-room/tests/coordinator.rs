//! Integration tests for the room coordinator using a recording broadcaster.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use codeshare_protocol::{Role, RoomId, ServerEvent};
use codeshare_room::{
    Broadcaster, ConnectionRecord, RoomCoordinator, RoomError, RoomRegistry,
};
use codeshare_transport::ConnectionId;

// =========================================================================
// Recording broadcaster: resolves groups at send time and logs every
// delivery per recipient.
// =========================================================================

#[derive(Default)]
struct Recorder {
    groups: HashMap<RoomId, BTreeSet<ConnectionId>>,
    delivered: RefCell<Vec<(ConnectionId, ServerEvent)>>,
}

impl Recorder {
    fn push(&self, to: ConnectionId, event: ServerEvent) {
        self.delivered.borrow_mut().push((to, event));
    }

    fn members(&self, room: &RoomId) -> Vec<ConnectionId> {
        self.groups
            .get(room)
            .map(|g| g.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl Broadcaster for Recorder {
    fn subscribe(&mut self, room: &RoomId, conn: ConnectionId) {
        self.groups.entry(room.clone()).or_default().insert(conn);
    }

    fn unsubscribe(&mut self, room: &RoomId, conn: ConnectionId) {
        if let Some(group) = self.groups.get_mut(room) {
            group.remove(&conn);
        }
    }

    fn dissolve(&mut self, room: &RoomId) {
        self.groups.remove(room);
    }

    fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        self.push(conn, event);
    }

    fn send_to_room(&self, room: &RoomId, event: ServerEvent) {
        for conn in self.members(room) {
            self.push(conn, event.clone());
        }
    }

    fn send_to_room_except(
        &self,
        room: &RoomId,
        except: ConnectionId,
        event: ServerEvent,
    ) {
        for conn in self.members(room) {
            if conn != except {
                self.push(conn, event.clone());
            }
        }
    }
}

// =========================================================================
// Helpers
// =========================================================================

struct Harness {
    coord: RoomCoordinator<Recorder>,
    records: HashMap<u64, ConnectionRecord>,
}

impl Harness {
    fn new() -> Self {
        Self {
            coord: RoomCoordinator::new(RoomRegistry::new(), Recorder::default()),
            records: HashMap::new(),
        }
    }

    fn join(&mut self, room: &str, id: u64) -> (Role, String) {
        let record = self
            .records
            .entry(id)
            .or_insert_with(|| ConnectionRecord::new(cid(id)));
        let a = self.coord.join(&RoomId::from(room), record);
        (a.role, a.display_name)
    }

    fn code(&mut self, room: &str, id: u64, code: &str) {
        self.coord.code_change(&RoomId::from(room), cid(id), code.into());
    }

    fn chat(&mut self, room: &str, id: u64, message: &str) {
        let record = self
            .records
            .get(&id)
            .cloned()
            .unwrap_or_else(|| ConnectionRecord::new(cid(id)));
        self.coord
            .chat_message(&RoomId::from(room), &record, message.into());
    }

    fn leave(&mut self, room: &str, id: u64) {
        self.coord.disconnect(&RoomId::from(room), cid(id));
    }

    /// Drains and returns everything delivered to `id` so far.
    fn inbox(&mut self, id: u64) -> Vec<ServerEvent> {
        let mut all = self.coord.broadcaster().delivered.borrow_mut();
        let (mine, rest): (Vec<_>, Vec<_>) =
            all.drain(..).partition(|(to, _)| *to == cid(id));
        *all = rest;
        mine.into_iter().map(|(_, e)| e).collect()
    }

    fn clear(&mut self) {
        self.coord.broadcaster().delivered.borrow_mut().clear();
    }
}

fn cid(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

fn count(n: usize) -> ServerEvent {
    ServerEvent::StudentCount { count: n }
}

fn update(code: &str) -> ServerEvent {
    ServerEvent::UpdateCode { code: code.into() }
}

// =========================================================================
// join
// =========================================================================

#[test]
fn test_join_first_is_mentor_then_numbered_students() {
    let mut h = Harness::new();
    assert_eq!(h.join("r1", 1), (Role::Mentor, "Mentor".into()));
    for n in 1..=5u64 {
        assert_eq!(
            h.join("r1", 1 + n),
            (Role::Student, format!("Student {n}"))
        );
    }
}

#[test]
fn test_join_numbering_is_gapless_despite_leaves() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2); // Student 1
    h.join("r1", 3); // Student 2
    h.leave("r1", 2);
    h.leave("r1", 3);
    assert_eq!(h.join("r1", 4).1, "Student 3");
}

#[test]
fn test_join_sends_role_then_count_to_joiner() {
    let mut h = Harness::new();
    h.join("r1", 1);
    assert_eq!(
        h.inbox(1),
        vec![
            ServerEvent::RoleAssigned {
                role: Role::Mentor,
                user_name: "Mentor".into()
            },
            count(0),
        ]
    );
}

#[test]
fn test_join_broadcasts_count_to_whole_room() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2);
    h.clear();

    h.join("r1", 3);
    assert_eq!(h.inbox(1), vec![count(2)]);
    assert_eq!(h.inbox(2), vec![count(2)]);
    assert_eq!(h.inbox(3).last(), Some(&count(2)));
}

#[test]
fn test_join_without_code_sends_no_snapshot() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2);
    let inbox = h.inbox(2);
    assert!(
        !inbox
            .iter()
            .any(|e| matches!(e, ServerEvent::UpdateCode { .. })),
        "no code yet, no updateCode"
    );
}

#[test]
fn test_late_joiner_gets_latest_code_before_count() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.code("r1", 1, "v1");
    h.code("r1", 1, "v2");
    h.clear();

    h.join("r1", 2);
    assert_eq!(
        h.inbox(2),
        vec![
            ServerEvent::RoleAssigned {
                role: Role::Student,
                user_name: "Student 1".into()
            },
            update("v2"),
            count(1),
        ]
    );
}

#[test]
fn test_late_joiner_gets_empty_code_once_set() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.code("r1", 1, "");
    h.clear();

    h.join("r1", 2);
    assert!(h.inbox(2).contains(&update("")));
}

#[test]
fn test_join_records_role_and_name() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2);
    let record = &h.records[&2];
    assert_eq!(record.role(), Some(Role::Student));
    assert_eq!(record.display_name(), Some("Student 1"));
}

#[test]
fn test_rooms_are_isolated() {
    let mut h = Harness::new();
    h.join("r1", 1);
    assert_eq!(h.join("r2", 2).0, Role::Mentor);
    assert_eq!(h.join("R1", 3).0, Role::Mentor, "room ids are case-sensitive");
    assert_eq!(h.coord.room_count(), 3);
}

// =========================================================================
// code_change
// =========================================================================

#[test]
fn test_code_change_relays_to_everyone_but_sender() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2);
    h.join("r1", 3);
    h.clear();

    h.code("r1", 2, "fn main() {}");

    assert!(h.inbox(2).is_empty(), "no echo to sender");
    assert_eq!(h.inbox(1), vec![update("fn main() {}")]);
    assert_eq!(h.inbox(3), vec![update("fn main() {}")]);
}

#[test]
fn test_code_change_last_write_wins_with_one_update_per_event() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2);
    h.clear();

    h.code("r1", 1, "a");
    h.code("r1", 2, "b");
    h.code("r1", 1, "c");

    let room = h.coord.room(&RoomId::from("r1")).unwrap();
    assert_eq!(room.current_code(), Some("c"));
    assert_eq!(h.inbox(1), vec![update("b")]);
    assert_eq!(h.inbox(2), vec![update("a"), update("c")]);
}

#[test]
fn test_code_change_absent_room_is_noop() {
    let mut h = Harness::new();
    h.code("ghost", 1, "x");
    assert_eq!(h.coord.room_count(), 0);
    assert!(h.inbox(1).is_empty());
}

// =========================================================================
// chat_message
// =========================================================================

#[test]
fn test_chat_reaches_whole_room_including_sender() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2);
    h.clear();

    h.chat("r1", 2, "hello");

    let expected = ServerEvent::ChatMessage {
        sender: "Student 1".into(),
        message: "hello".into(),
    };
    assert_eq!(h.inbox(1), vec![expected.clone()]);
    assert_eq!(h.inbox(2), vec![expected]);
}

#[test]
fn test_chat_from_unnamed_connection_is_unknown() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.clear();

    h.chat("r1", 99, "who am i");

    assert_eq!(
        h.inbox(1),
        vec![ServerEvent::ChatMessage {
            sender: "Unknown".into(),
            message: "who am i".into()
        }]
    );
}

#[test]
fn test_chat_absent_room_is_noop() {
    let mut h = Harness::new();
    h.chat("ghost", 1, "anyone?");
    assert!(h.inbox(1).is_empty());
}

#[test]
fn test_mentor_repeat_join_becomes_student_but_keeps_seat() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2);
    h.clear();

    assert_eq!(h.join("r1", 1), (Role::Student, "Student 2".into()));
    assert_eq!(
        h.inbox(1),
        vec![
            ServerEvent::RoleAssigned {
                role: Role::Student,
                user_name: "Student 2".into(),
            },
            count(2),
        ]
    );
    let room = h.coord.room(&RoomId::from("r1")).unwrap();
    assert!(room.is_mentor(cid(1)));
    assert_eq!(room.student_count(), 2);

    h.clear();
    h.leave("r1", 1);

    assert_eq!(h.inbox(2), vec![ServerEvent::MentorLeft {}]);
    assert!(h.coord.room(&RoomId::from("r1")).is_none());
}

// =========================================================================
// disconnect
// =========================================================================

#[test]
fn test_mentor_disconnect_notifies_others_and_destroys_room() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2);
    h.join("r1", 3);
    h.clear();

    h.leave("r1", 1);

    assert!(h.inbox(1).is_empty(), "departed mentor gets nothing");
    assert_eq!(h.inbox(2), vec![ServerEvent::MentorLeft {}]);
    assert_eq!(h.inbox(3), vec![ServerEvent::MentorLeft {}]);
    assert!(h.coord.room(&RoomId::from("r1")).is_none());
    assert!(matches!(
        h.coord.room_info(&RoomId::from("r1")),
        Err(RoomError::NotFound(_))
    ));
}

#[test]
fn test_room_recreated_after_mentor_leaves() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2);
    h.code("r1", 1, "old");
    h.leave("r1", 1);
    h.clear();

    assert_eq!(h.join("r1", 3), (Role::Mentor, "Mentor".into()));
    assert_eq!(h.join("r1", 4).1, "Student 1", "numbering restarts");

    let room = h.coord.room(&RoomId::from("r1")).unwrap();
    assert_eq!(room.current_code(), None, "old code discarded");
    assert!(h.inbox(2).is_empty(), "old group was dissolved");
}

#[test]
fn test_student_disconnect_sends_exactly_one_count() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.join("r1", 2);
    h.join("r1", 3);
    h.clear();

    h.leave("r1", 2);

    assert_eq!(h.inbox(1), vec![count(1)]);
    assert_eq!(h.inbox(3), vec![count(1)]);
    assert!(h.inbox(2).is_empty());

    let room = h.coord.room(&RoomId::from("r1")).unwrap();
    assert_eq!(room.mentor(), Some(cid(1)));
    assert_eq!(room.student_name(cid(3)), Some("Student 2"));
}

#[test]
fn test_disconnect_of_unknown_connection_is_noop() {
    let mut h = Harness::new();
    h.join("r1", 1);
    h.clear();

    h.leave("r1", 42);
    h.leave("ghost", 1);

    assert!(h.inbox(1).is_empty());
    assert_eq!(h.coord.room_count(), 1);
}

// =========================================================================
// End-to-end scenario
// =========================================================================

#[test]
fn test_scenario_r1_full_lifecycle() {
    let mut h = Harness::new();

    assert_eq!(h.join("r1", 1), (Role::Mentor, "Mentor".into())); // A
    h.clear();

    assert_eq!(h.join("r1", 2), (Role::Student, "Student 1".into())); // B
    assert_eq!(h.inbox(1), vec![count(1)]);

    assert_eq!(h.join("r1", 3), (Role::Student, "Student 2".into())); // C
    assert_eq!(h.inbox(1), vec![count(2)]);
    h.clear();

    h.leave("r1", 2);
    assert_eq!(h.inbox(1), vec![count(1)]);
    assert_eq!(h.inbox(3), vec![count(1)]);

    h.leave("r1", 1);
    assert_eq!(h.inbox(3), vec![ServerEvent::MentorLeft {}]);
    assert_eq!(h.coord.room_count(), 0);
}
