use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, error};
use tungstenite::protocol::Message as WsMessage;

use crate::connection::{Connection, ConnectionId};
use crate::hub::command::Command;
use crate::hub::event::{Event, Scope};
use crate::hub::room::{Room, RoomId};

/// The connection registry and the control loop that owns it.
///
/// The hub maps each room to the set of connections currently watching it
/// and is the only code that ever mutates that mapping. Everyone else
/// (the transport after an upgrade, read/write tasks on failure, event
/// producers after a commit) sends a [`Command`] through a [`HubHandle`]
/// and moves on. Commands are processed one at a time in arrival order,
/// so the registry needs no locking and two broadcasts can never
/// interleave mid-delivery.
#[derive(Debug, Default)]
pub struct Hub {
    pub(crate) rooms: HashMap<RoomId, Room>,
}

impl Hub {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Spawns the control loop on the current runtime and returns the
    /// handle callers use to reach it. The loop runs until every handle
    /// is dropped.
    pub fn spawn() -> HubHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::new().run(rx));
        HubHandle { tx }
    }

    /// Drains the inbox until all senders are gone. Each command is fully
    /// applied before the next is taken.
    pub async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Command>) {
        while let Some(cmd) = inbox.recv().await {
            self.apply(cmd);
        }
        debug!("Hub inbox closed, control loop exiting");
    }

    pub(crate) fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::Register { conn, room_id } => self.register(conn, room_id),
            Command::Unregister { conn_id, room_id } => self.unregister(&conn_id, room_id),
            Command::Broadcast { scope, event } => self.broadcast(scope, &event),
        }
    }

    /// Adds a connection to a room, creating the room's set if this is
    /// its first member. Never fails; there is no room id validation.
    pub fn register(&mut self, conn: Connection, room_id: RoomId) {
        debug!("{} registered in room {}", conn.id, room_id);
        self.rooms
            .entry(room_id)
            .or_insert_with(|| Room::new(room_id))
            .insert(conn);
    }

    /// Removes a connection from a room and drops it, closing its
    /// outbound queue. Unregistering a connection that is already gone is
    /// a no-op, so failure paths can always call this safely.
    pub fn unregister(&mut self, conn_id: &str, room_id: RoomId) {
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.remove(conn_id);
            if room.is_empty() {
                self.rooms.remove(&room_id);
            }
        }
    }

    /// Delivers an event to every connection in scope.
    ///
    /// The event is serialized once and the frame fanned out; a member
    /// that cannot accept it is dropped and delivery continues with the
    /// rest. Producers get no result back: delivery is best-effort and
    /// a failed connection is purely the hub's problem.
    pub fn broadcast(&mut self, scope: Scope, event: &Event) {
        let text = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize event: {:?}", e);
                return;
            }
        };
        let frame = WsMessage::text(text);

        match scope {
            Scope::Room(room_id) => {
                if let Some(room) = self.rooms.get_mut(&room_id) {
                    room.deliver(&frame);
                    if room.is_empty() {
                        self.rooms.remove(&room_id);
                    }
                }
            }
            Scope::Global => {
                for room in self.rooms.values_mut() {
                    room.deliver(&frame);
                }
                self.rooms.retain(|_, room| !room.is_empty());
            }
        }
    }
}

/// Clonable handle to the hub's control loop.
///
/// All three operations are fire-and-forget: they enqueue a command and
/// return immediately, without waiting for the registry or for delivery.
/// Sends only fail once the control loop is gone (process shutdown), and
/// that failure is deliberately swallowed.
#[derive(Debug, Clone)]
pub struct HubHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl HubHandle {
    pub fn register(&self, conn: Connection, room_id: RoomId) {
        let _ = self.tx.send(Command::Register { conn, room_id });
    }

    pub fn unregister(&self, conn_id: ConnectionId, room_id: RoomId) {
        let _ = self.tx.send(Command::Unregister { conn_id, room_id });
    }

    pub fn broadcast(&self, scope: Scope, event: Event) {
        let _ = self.tx.send(Command::Broadcast { scope, event });
    }
}
