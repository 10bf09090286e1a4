pub mod command;
pub mod engine;
pub mod event;
pub mod room;

pub use command::Command;
pub use engine::{Hub, HubHandle};
pub use event::{ChatMessage, Event, Scope};
pub use room::RoomId;

#[cfg(test)]
mod tests;
