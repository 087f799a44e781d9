mod config;
mod models;
mod processor;
mod transit;
mod warehouse;

use config::AppConfig;
use processor::commute_processor::{self, SystemClock};
use tracing::info;
use transit::TransitClient;
use warehouse::WarehouseClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .init();

    info!("Starting commute tracker ({} profile)", config.profile);

    let transit = TransitClient::new(&config)?;

    // One warehouse handle serves both directions
    let warehouse = WarehouseClient::connect(&config).await?;
    info!("Writing to {} via {}", config.table, warehouse.backend());

    commute_processor::run(&config, &transit, &warehouse, &SystemClock).await?;

    Ok(())
}
