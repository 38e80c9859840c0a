//! Pot seeding configuration from config.toml.
//!
//! This module loads initial pot definitions from a TOML file. The pots
//! defined there are used to seed the database on first run or when pots are
//! missing; existing pots are never touched.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire seed file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Spending pots to seed
    #[serde(default)]
    pub spending_pots: Vec<SpendingPotSeed>,
    /// Savings pots to seed
    #[serde(default)]
    pub savings_pots: Vec<SavingsPotSeed>,
}

/// Seed definition for a single spending pot
#[derive(Debug, Deserialize, Clone)]
pub struct SpendingPotSeed {
    /// Name of the pot
    pub name: String,
    /// Initial allocation in minor units (pence)
    pub allocation: i64,
}

/// Seed definition for a single savings pot
#[derive(Debug, Deserialize, Clone)]
pub struct SavingsPotSeed {
    /// Name of the pot
    pub name: String,
}

/// Loads pot seed configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or required fields are missing.
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed config: {e}"),
    })
}
