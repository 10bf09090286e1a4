use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::config::{HubSettings, Settings};
use crate::connection::Connection;
use crate::hub::HubHandle;
use crate::hub::room::RoomId;
use crate::utils::error::TransportError;

/// Binds `addr` and serves WebSocket upgrades until the process exits.
pub async fn start_websocket_server(
    addr: &str,
    hub: HubHandle,
    settings: Settings,
) -> Result<(), TransportError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!("WebSocket server listening on ws://{}", addr);
    serve(listener, hub, settings).await;
    Ok(())
}

/// Accept loop over an already-bound listener. Split from
/// [`start_websocket_server`] so callers that need the actual port (tests
/// bind to port 0) can hold the listener themselves.
pub async fn serve(listener: TcpListener, hub: HubHandle, settings: Settings) {
    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(handle_connection(stream, hub.clone(), settings.hub.clone()));
    }
}

/// Runs one connection from upgrade to disconnect.
///
/// The upgrade request names the room to join (`?room_id=N`). After the
/// handshake the connection is registered with the hub and split in two:
/// a writer task draining the hub-fed outbound queue onto the socket, and
/// the read loop below, which discards inbound frames and only watches
/// for the connection to die. Either side failing unregisters the
/// connection; unregistration is idempotent so both may.
async fn handle_connection(stream: TcpStream, hub: HubHandle, settings: HubSettings) {
    let mut room_id: RoomId = 0;
    let ws_stream = match accept_hdr_async(stream, |req: &Request, resp: Response| {
        room_id = room_from_request(req);
        Ok(resp)
    })
    .await
    {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::channel::<WsMessage>(settings.outbound_queue);
    let conn = Connection::new(tx);
    let conn_id = conn.id.clone();

    hub.register(conn, room_id);
    info!("{} joined room {}", conn_id, room_id);

    // Writer: the only task that touches the socket's send half. When the
    // hub drops the connection, the queue closes, the loop ends and the
    // socket is shut. Each write is bounded so one stalled client cannot
    // hold its queue slot forever.
    let write_timeout = Duration::from_millis(settings.write_timeout_ms);
    let writer_hub = hub.clone();
    let writer_conn_id = conn_id.clone();
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match timeout(write_timeout, ws_sender.send(frame)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!("Write to {} failed: {}", writer_conn_id, e);
                    break;
                }
                Err(_) => {
                    warn!("Write to {} timed out", writer_conn_id);
                    break;
                }
            }
        }
        writer_hub.unregister(writer_conn_id, room_id);
        let _ = ws_sender.close().await;
    });

    // Clients are listeners; inbound frames carry no commands. The read
    // loop exists to notice the disconnect.
    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(frame) if frame.is_close() => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Read from {} failed: {}", conn_id, e);
                break;
            }
        }
    }

    info!("{} left room {}", conn_id, room_id);
    hub.unregister(conn_id, room_id);
}

/// Extracts the room id from the upgrade request's query string. A
/// missing or unparsable `room_id` falls back to room 0, the room
/// home/dashboard clients sit in.
fn room_from_request(req: &Request) -> RoomId {
    req.uri()
        .query()
        .and_then(|query| {
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix("room_id="))
        })
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
