//! Log Output Setup

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::BridgeError;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Output goes to stderr so
/// responses printed on stdout stay machine-readable. Fails with
/// [`BridgeError::SubscriberExists`] if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), BridgeError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| BridgeError::Logging(format!("bad filter '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|_| BridgeError::SubscriberExists)
}
