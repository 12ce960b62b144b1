//! GESTIMA bootstrap binary.
//!
//! Initializes logging, loads settings, connects to the database, and creates
//! the schema. The HTTP layer in front of the core is a separate concern and
//! mounts on top of the connection prepared here.

use dotenvy::dotenv;
use gestima::{
    cache::ReferenceCache,
    config::{database, settings},
    errors::Result,
};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Pricing policy (defaults when gestima.toml is absent)
    let pricing = settings::load_default_settings()?;
    info!(
        margin = pricing.default_margin_percent,
        coop_floor = pricing.coop_minimum_price,
        "pricing settings loaded"
    );

    // 4. Database: connect and create schema
    let db = database::create_connection().await?;
    database::create_tables(&db).await?;
    info!(url = %database::get_database_url(), "database initialized");

    // 5. Reference-data cache shared by the costing services
    let _cache = ReferenceCache::new(Duration::from_secs(300));
    info!("GESTIMA core ready");

    Ok(())
}
