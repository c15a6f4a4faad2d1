pub mod history;

use anyhow::Result;
use cryptocompare_candles::ClientConfig;
use tracing::info;

/// Client settings from a JSON file when given, otherwise from the environment
pub fn load_config(path: Option<&str>) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::from_env()?,
    };
    info!("Using API base URL {}", config.base_url);
    Ok(config)
}
