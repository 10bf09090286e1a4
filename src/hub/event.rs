use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hub::room::RoomId;

/// Target of a broadcast.
///
/// `Global` reaches every connection in every room, including room 0;
/// it is how producers push home/dashboard events (aggregate unread
/// counts, mention notifications) to clients regardless of which room
/// they are watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every connection in every room.
    Global,
    /// Only the connections subscribed to this room.
    Room(RoomId),
}

/// A chat event submitted for delivery.
///
/// The hub never inspects these beyond serializing them; the variants
/// exist so producers cannot send a malformed payload. On the wire each
/// event is a JSON object tagged by a `type` field, the shape chat
/// clients already consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "new_message")]
    NewMessage { message: ChatMessage },

    #[serde(rename = "message_revoked")]
    MessageRevoked { message_id: i64 },

    #[serde(rename = "read_update")]
    ReadUpdate {
        message_id: i64,
        readers: Vec<String>,
    },

    #[serde(rename = "unread_update")]
    UnreadUpdate {
        room_id: RoomId,
        unread_map: HashMap<String, i64>,
    },

    #[serde(rename = "user_entered")]
    UserEntered { user: String, room_id: RoomId },

    #[serde(rename = "user_left")]
    UserLeft { user: String, room_id: RoomId },

    #[serde(rename = "mention_notify")]
    MentionNotify {
        to_user: i64,
        message_id: i64,
        room_id: RoomId,
        from: String,
        content: String,
        timestamp: DateTime<Utc>,
    },
}

/// The message body carried by a `new_message` event.
///
/// `attachment` is only present for messages born from a file upload, so
/// it is omitted from the wire form when absent; `thread_root_id` is
/// always emitted (null for top-level messages), matching what clients
/// expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub room_id: RoomId,
    pub sender: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub thread_root_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}
