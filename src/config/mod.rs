//! Configuration management for the pot ledger.
//!
//! Configuration is loaded once at process start into an immutable
//! [`AppConfig`] and passed by reference into whatever needs it; there is no
//! global mutable settings cache.

/// Database configuration and connection management
pub mod database;

/// Pot seeding configuration from config.toml
pub mod pots;

use crate::errors::Result;

/// Immutable application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,
    /// Path to the optional pot seed file
    pub seed_config_path: String,
}

/// Loads the application configuration from the environment.
///
/// `DATABASE_URL` falls back to a local `SQLite` file and
/// `POT_SEED_CONFIG` falls back to `./config.toml`; both can be supplied via
/// a `.env` file loaded by the binary before this runs.
pub fn load_app_configuration() -> Result<AppConfig> {
    Ok(AppConfig {
        database_url: std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/pot_ledger.sqlite?mode=rwc".to_string()),
        seed_config_path: std::env::var("POT_SEED_CONFIG")
            .unwrap_or_else(|_| "config.toml".to_string()),
    })
}
