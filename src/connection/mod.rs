//! The `connection` module defines the representation of one live client
//! connection in the hub.
//!
//! It provides the `Connection` struct, which pairs a connection's unique
//! identity with the bounded queue feeding its outbound writer task.

pub mod conn;
pub use conn::{Connection, ConnectionId};
