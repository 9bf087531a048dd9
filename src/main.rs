use std::sync::Arc;

use tokio::signal;

use oai_pmh_listener::config::{BasicConfigManager, ConfigManager};
use oai_pmh_listener::middleware::init_tracing;
use oai_pmh_listener::{Listener, ListenerError, OaiListener};

#[tokio::main]
async fn main() -> Result<(), ListenerError> {
    // Optional JSON configuration file as the first argument
    let config_manager = Arc::new(BasicConfigManager::new());
    if let Some(path) = std::env::args().nth(1) {
        config_manager.load_from_file(path).await?;
    }
    let config = config_manager.get_config().await;

    init_tracing(&config.logging);

    tracing::info!(
        "Serving documents from {} with delay settings from {}",
        config.content.content_dir.display(),
        config.content.settings_file.display()
    );

    let listener = OaiListener::new(&config);
    listener.start().await?;
    tracing::info!("Waiting for a new connection...");

    signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping listener");

    listener.stop().await?;
    tracing::info!("Listener stopped successfully");

    Ok(())
}
