//! Configuration management for Shelfmark

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct StoresConfig {
    /// Accounts store (user identities and roles)
    pub accounts_url: String,
    /// Library store (catalog items and requests)
    pub library_url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

/// Role keys required to sign up privileged accounts
#[derive(Debug, Deserialize, Clone)]
pub struct SignupConfig {
    pub librarian_key: String,
    pub admin_key: String,
}

/// Default library rules, seeded into the library store on first run
#[derive(Debug, Deserialize, Clone)]
pub struct RulesConfig {
    pub borrow_limit: i64,
    pub loan_period_days: i64,
    pub late_penalty_per_day: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub stores: StoresConfig,
    pub logging: LoggingConfig,
    pub signup: SignupConfig,
    pub rules: RulesConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix SHELFMARK_)
            .add_source(
                Environment::with_prefix("SHELFMARK")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override store URLs from env vars if present
            .set_override_option("stores.accounts_url", env::var("ACCOUNTS_DATABASE_URL").ok())?
            .set_override_option("stores.library_url", env::var("LIBRARY_DATABASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            accounts_url: "sqlite:accounts.db?mode=rwc".to_string(),
            library_url: "sqlite:library.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            borrow_limit: 5,
            loan_period_days: 14,
            late_penalty_per_day: 1.0,
        }
    }
}
