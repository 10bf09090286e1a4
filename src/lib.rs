//! # Roomcast
//!
//! `roomcast` is the real-time delivery backbone of a web chat backend. It
//! keeps track of which live WebSocket connections belong to which chat room
//! and fans chat events out to them, without blocking event producers and
//! without letting one broken connection disturb the rest.
//!
//! Event producers (the chat backend's request handlers) hold a [`hub::HubHandle`]
//! and submit broadcasts after their state change commits; delivery is
//! best-effort and fully decoupled from the request/response cycle.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `hub`: the connection registry and control loop that routes events to rooms.
//! - `connection`: represents one live client connection owned by the hub.
//! - `transport`: the WebSocket server and per-connection read/write tasks.
//! - `config`: handles loading and managing server configuration.
//! - `utils`: shared utilities such as logging setup and error types.

pub mod config;
pub mod connection;
pub mod hub;
pub mod transport;
pub mod utils;
