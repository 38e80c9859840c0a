//! Pot ledger entrypoint: boots configuration and the database, seeds any
//! missing pots from `config.toml`, and logs the current dashboard figures.
//! The transport layer that exposes the ledger operations lives elsewhere.

use dotenvy::dotenv;
use pot_ledger::{config, core, errors::Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // .env is optional; env vars can be set externally
    dotenv().ok();

    let app_config = config::load_app_configuration()?;
    info!(database_url = %app_config.database_url, "configuration loaded");

    let db = config::database::create_connection(&app_config.database_url).await?;
    config::database::create_tables(&db).await?;
    info!("database initialized");

    match config::pots::load_seed_config(&app_config.seed_config_path) {
        Ok(seed) => {
            let created = core::pot::seed_initial_pots(&db, &seed).await?;
            info!(created, "pot seeding complete");
        }
        Err(e) => warn!(error = %e, "no pot seed config loaded, skipping"),
    }

    let stats = core::stats::get_homepage_stats(&db).await?;
    info!(
        money_in = stats.money_in,
        money_spent = stats.money_spent,
        money_left = stats.money_left,
        total_in_savings = stats.total_in_savings,
        total_in_spending_pots = stats.total_in_spending_pots,
        "pot ledger ready"
    );

    Ok(())
}
