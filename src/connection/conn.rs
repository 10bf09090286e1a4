use tokio::sync::mpsc::Sender;
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

/// Unique identifier of a live connection, used as the registry key.
pub type ConnectionId = String;

/// One live client connection as the hub sees it.
///
/// The hub owns the connection exclusively from registration until it is
/// unregistered or found dead during a broadcast. The `sender` is the
/// bounded outbound queue drained by the connection's writer task;
/// dropping it is how the hub closes the connection.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub sender: Sender<WsMessage>,
}

impl Connection {
    pub fn new(sender: Sender<WsMessage>) -> Self {
        Self {
            id: format!("conn-{}", Uuid::new_v4()),
            sender,
        }
    }
}
