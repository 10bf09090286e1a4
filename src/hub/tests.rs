use super::Hub;
use super::event::{ChatMessage, Event, Scope};
use super::room::Room;
use crate::connection::Connection;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{Duration, timeout};
use tungstenite::protocol::Message as WsMessage;

fn probe(capacity: usize) -> (Connection, mpsc::Receiver<WsMessage>) {
    let (tx, rx) = mpsc::channel(capacity);
    (Connection::new(tx), rx)
}

fn revoked(message_id: i64) -> Event {
    Event::MessageRevoked { message_id }
}

fn parse(frame: WsMessage) -> Value {
    serde_json::from_str(frame.to_text().unwrap()).unwrap()
}

#[test]
fn test_room_insert_and_remove() {
    let mut room = Room::new(5);
    let (conn, _rx) = probe(8);
    let conn_id = conn.id.clone();

    room.insert(conn);
    assert!(room.connections.contains_key(&conn_id));

    room.remove(&conn_id);
    assert!(room.is_empty());
}

#[test]
fn test_room_remove_missing_is_noop() {
    let mut room = Room::new(5);
    room.remove("conn-never-registered");
    assert!(room.is_empty());
}

#[test]
fn test_register_creates_room() {
    let mut hub = Hub::new();
    let (conn, _rx) = probe(8);
    let conn_id = conn.id.clone();

    hub.register(conn, 5);

    let room = hub.rooms.get(&5).unwrap();
    assert!(room.connections.contains_key(&conn_id));
}

#[test]
fn test_room_broadcast_delivers_to_all_members_exactly_once() {
    let mut hub = Hub::new();
    let (c1, mut rx1) = probe(8);
    let (c2, mut rx2) = probe(8);
    hub.register(c1, 5);
    hub.register(c2, 5);

    hub.broadcast(Scope::Room(5), &revoked(42));

    for rx in [&mut rx1, &mut rx2] {
        let value = parse(rx.try_recv().unwrap());
        assert_eq!(value["type"], "message_revoked");
        assert_eq!(value["message_id"], 42);
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }
}

#[test]
fn test_broadcast_does_not_cross_rooms() {
    let mut hub = Hub::new();
    let (c1, mut rx1) = probe(8);
    let (c2, mut rx2) = probe(8);
    hub.register(c1, 5);
    hub.register(c2, 2);

    hub.broadcast(Scope::Room(7), &revoked(1));
    assert_eq!(rx1.try_recv().unwrap_err(), TryRecvError::Empty);

    hub.broadcast(Scope::Room(5), &revoked(2));
    assert!(rx1.try_recv().is_ok());
    assert_eq!(rx2.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[test]
fn test_unregistered_connection_receives_nothing() {
    let mut hub = Hub::new();
    let (conn, mut rx) = probe(8);
    let conn_id = conn.id.clone();
    hub.register(conn, 5);

    hub.unregister(&conn_id, 5);
    hub.broadcast(Scope::Room(5), &revoked(3));

    // The registry held the only sender, so the queue is now closed.
    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Disconnected);
}

#[test]
fn test_unregister_is_idempotent() {
    let mut hub = Hub::new();
    let (c1, _rx1) = probe(8);
    let (c2, mut rx2) = probe(8);
    let c1_id = c1.id.clone();
    hub.register(c1, 5);
    hub.register(c2, 5);

    hub.unregister(&c1_id, 5);
    hub.unregister(&c1_id, 5);
    hub.unregister("conn-never-registered", 9);

    hub.broadcast(Scope::Room(5), &revoked(4));
    assert!(rx2.try_recv().is_ok());
}

#[test]
fn test_global_broadcast_reaches_every_room() {
    let mut hub = Hub::new();
    let (c1, mut rx1) = probe(8);
    let (c2, mut rx2) = probe(8);
    let (c3, mut rx3) = probe(8);
    hub.register(c1, 1);
    hub.register(c2, 2);
    hub.register(c3, 0);

    hub.broadcast(Scope::Global, &revoked(5));

    for rx in [&mut rx1, &mut rx2, &mut rx3] {
        let value = parse(rx.try_recv().unwrap());
        assert_eq!(value["type"], "message_revoked");
    }
}

#[test]
fn test_broadcast_survives_closed_connection() {
    let mut hub = Hub::new();
    let (c1, rx1) = probe(8);
    let (c2, mut rx2) = probe(8);
    hub.register(c1, 5);
    hub.register(c2, 5);

    // Simulate a dead writer task.
    drop(rx1);

    hub.broadcast(Scope::Room(5), &revoked(6));

    assert!(rx2.try_recv().is_ok());
    assert_eq!(hub.rooms.get(&5).unwrap().connections.len(), 1);
}

#[test]
fn test_broadcast_drops_backlogged_connection() {
    let mut hub = Hub::new();
    let (c1, mut rx1) = probe(1);
    let (c2, mut rx2) = probe(8);
    hub.register(c1, 5);
    hub.register(c2, 5);

    // First broadcast fills c1's queue; the second overflows it and c1 is
    // dropped, while c2 keeps receiving.
    hub.broadcast(Scope::Room(5), &revoked(7));
    hub.broadcast(Scope::Room(5), &revoked(8));

    assert!(rx1.try_recv().is_ok());
    assert_eq!(rx1.try_recv().unwrap_err(), TryRecvError::Disconnected);

    assert!(rx2.try_recv().is_ok());
    assert!(rx2.try_recv().is_ok());
    assert_eq!(hub.rooms.get(&5).unwrap().connections.len(), 1);
}

#[test]
fn test_duplicate_register_delivers_once() {
    let mut hub = Hub::new();
    let (tx, mut rx) = mpsc::channel(8);
    let first = Connection {
        id: "conn-duplicate".to_string(),
        sender: tx.clone(),
    };
    let second = Connection {
        id: "conn-duplicate".to_string(),
        sender: tx,
    };

    hub.register(first, 5);
    hub.register(second, 5);

    hub.broadcast(Scope::Room(5), &revoked(9));

    assert!(rx.try_recv().is_ok());
    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[test]
fn test_empty_room_is_pruned_after_unregister() {
    let mut hub = Hub::new();
    let (conn, _rx) = probe(8);
    let conn_id = conn.id.clone();
    hub.register(conn, 5);

    hub.unregister(&conn_id, 5);
    assert!(!hub.rooms.contains_key(&5));
}

#[tokio::test]
async fn test_commands_processed_in_submission_order() {
    let hub = Hub::spawn();
    let (tx, mut rx) = mpsc::channel(8);
    hub.register(Connection::new(tx), 5);
    hub.broadcast(Scope::Room(5), revoked(42));

    let frame = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("no delivery within timeout")
        .expect("queue closed before delivery");
    let value = parse(frame);
    assert_eq!(value["type"], "message_revoked");
    assert_eq!(value["message_id"], 42);
}

#[test]
fn test_new_message_wire_shape() {
    let event = Event::NewMessage {
        message: ChatMessage {
            id: 17,
            room_id: 5,
            sender: "alice".to_string(),
            content: "hello".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap(),
            thread_root_id: None,
            attachment: None,
        },
    };

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "new_message");
    assert_eq!(value["message"]["id"], 17);
    assert_eq!(value["message"]["room_id"], 5);
    assert_eq!(value["message"]["sender"], "alice");
    assert_eq!(value["message"]["content"], "hello");
    assert_eq!(value["message"]["created_at"], "2025-05-20T12:00:00Z");
    assert!(value["message"]["thread_root_id"].is_null());
    assert!(value["message"].get("attachment").is_none());
}

#[test]
fn test_attachment_message_wire_shape() {
    let event = Event::NewMessage {
        message: ChatMessage {
            id: 18,
            room_id: 5,
            sender: "bob".to_string(),
            content: String::new(),
            created_at: Utc.with_ymd_and_hms(2025, 5, 20, 12, 5, 0).unwrap(),
            thread_root_id: None,
            attachment: Some("/uploads/17479_report.pdf".to_string()),
        },
    };

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["message"]["attachment"], "/uploads/17479_report.pdf");
    assert_eq!(value["message"]["content"], "");
}

#[test]
fn test_presence_and_revoke_wire_shapes() {
    assert_eq!(
        serde_json::to_value(Event::UserEntered {
            user: "alice".to_string(),
            room_id: 5,
        })
        .unwrap(),
        json!({"type": "user_entered", "user": "alice", "room_id": 5})
    );
    assert_eq!(
        serde_json::to_value(Event::UserLeft {
            user: "alice".to_string(),
            room_id: 5,
        })
        .unwrap(),
        json!({"type": "user_left", "user": "alice", "room_id": 5})
    );
    assert_eq!(
        serde_json::to_value(Event::MessageRevoked { message_id: 7 }).unwrap(),
        json!({"type": "message_revoked", "message_id": 7})
    );
}

#[test]
fn test_read_and_unread_wire_shapes() {
    assert_eq!(
        serde_json::to_value(Event::ReadUpdate {
            message_id: 9,
            readers: vec!["alice".to_string(), "bob".to_string()],
        })
        .unwrap(),
        json!({"type": "read_update", "message_id": 9, "readers": ["alice", "bob"]})
    );

    let unread = Event::UnreadUpdate {
        room_id: 5,
        unread_map: [("carol".to_string(), 3)].into_iter().collect(),
    };
    assert_eq!(
        serde_json::to_value(&unread).unwrap(),
        json!({"type": "unread_update", "room_id": 5, "unread_map": {"carol": 3}})
    );
}

#[test]
fn test_mention_notify_wire_shape() {
    let event = Event::MentionNotify {
        to_user: 3,
        message_id: 11,
        room_id: 4,
        from: "bob".to_string(),
        content: "@alice see this".to_string(),
        timestamp: Utc.with_ymd_and_hms(2025, 5, 20, 9, 30, 0).unwrap(),
    };

    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({
            "type": "mention_notify",
            "to_user": 3,
            "message_id": 11,
            "room_id": 4,
            "from": "bob",
            "content": "@alice see this",
            "timestamp": "2025-05-20T09:30:00Z"
        })
    );
}
