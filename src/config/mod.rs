mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{HubSettings, ServerSettings, Settings};


/// Loads configuration from the optional `config/default` file and from
/// environment variables (`SERVER_PORT=9000` style), filling anything left
/// unset from the built-in defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    let _ = dotenvy::dotenv();

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Whatever the sources provide, field by field
    let partial: PartialSettings = config.try_deserialize()?;

    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        hub: HubSettings {
            outbound_queue: partial
                .hub
                .as_ref()
                .and_then(|h| h.outbound_queue)
                .unwrap_or(default.hub.outbound_queue),
            write_timeout_ms: partial
                .hub
                .as_ref()
                .and_then(|h| h.write_timeout_ms)
                .unwrap_or(default.hub.write_timeout_ms),
        },
    })
}
