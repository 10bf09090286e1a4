//! Custom error types used within the `roomcast` application.
//!
//! The hub itself has no error surface: registration is infallible,
//! unregistration is idempotent and delivery failures are handled by
//! dropping the affected connection. What remains fallible is the
//! transport's contact with the outside world.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
