use std::collections::HashMap;

use crate::connection::{Connection, ConnectionId};
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;
use tungstenite::protocol::Message as WsMessage;

/// Identifier of a chat room. Room ids come from the chat backend's room
/// table; id 0 is the room home/dashboard clients join.
pub type RoomId = i64;

/// One room's set of live connections, keyed by connection id.
///
/// A connection belongs to at most one room at a time; the room owns it
/// from registration until it is removed or found dead during delivery.
#[derive(Debug)]
pub struct Room {
    pub(crate) id: RoomId,
    pub(crate) connections: HashMap<ConnectionId, Connection>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            connections: HashMap::new(),
        }
    }

    /// Adds a connection to the room. Inserting the same connection id
    /// again replaces the previous entry, so a member is never delivered
    /// to twice.
    pub fn insert(&mut self, conn: Connection) {
        self.connections.insert(conn.id.clone(), conn);
    }

    /// Removes a connection from the room. Removing an id that is not a
    /// member has no effect. Dropping the connection closes its outbound
    /// queue, which ends the writer task and shuts the socket.
    pub fn remove(&mut self, conn_id: &str) {
        self.connections.remove(conn_id);
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Queues `frame` on every member's outbound queue. A member whose
    /// queue is full or closed is dead to the hub: it is dropped from the
    /// room and delivery continues with the rest.
    pub(crate) fn deliver(&mut self, frame: &WsMessage) {
        let mut dead: Vec<ConnectionId> = Vec::new();

        for (conn_id, conn) in &self.connections {
            match conn.sender.try_send(frame.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(
                        "Outbound queue full for {} in room {}, dropping connection",
                        conn_id, self.id
                    );
                    dead.push(conn_id.clone());
                }
                Err(TrySendError::Closed(_)) => {
                    warn!("Connection {} in room {} is gone, dropping", conn_id, self.id);
                    dead.push(conn_id.clone());
                }
            }
        }

        for conn_id in dead {
            self.connections.remove(&conn_id);
        }
    }
}
