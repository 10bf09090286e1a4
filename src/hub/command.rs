use crate::connection::{Connection, ConnectionId};
use crate::hub::event::{Event, Scope};
use crate::hub::room::RoomId;

/// A request to the hub's control loop.
///
/// All registry mutations travel through this enum over a single channel,
/// so the loop processes them strictly one at a time and callers never
/// touch the registry directly.
#[derive(Debug)]
pub enum Command {
    Register {
        conn: Connection,
        room_id: RoomId,
    },
    Unregister {
        conn_id: ConnectionId,
        room_id: RoomId,
    },
    Broadcast {
        scope: Scope,
        event: Event,
    },
}
