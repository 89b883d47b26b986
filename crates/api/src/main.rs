//! Vehicle Price Pipeline - Main Entry Point
//!
//! Usage: `price-server [CONFIG_FILE]`

use api::{init_logging, run_server, AppConfig};
use std::path::PathBuf;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    init_logging(&config.logging)?;

    info!("=== Vehicle Price Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server(config).await {
        error!("Server stopped: {}", e);
        return Err(e.into());
    }

    Ok(())
}
