use tracing::Level;

/// Initialize tracing for the application.
///
/// `default_level` is parsed as a `tracing::Level` name; anything
/// unrecognized falls back to `info`.
pub fn init(default_level: &str) {
    let level: Level = default_level.parse().unwrap_or(Level::INFO);

    // try_init so tests can call this repeatedly without panicking
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
