//! The `transport` module is responsible for network communication with
//! clients over WebSockets.
//!
//! It implements the WebSocket server itself: accepting TCP connections,
//! performing the protocol upgrade, registering the resulting connection
//! with the hub for the room named in the upgrade request, and running the
//! per-connection read and write tasks until the connection dies.

pub mod websocket;
