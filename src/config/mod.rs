use crate::core::calendar::{BusinessClock, INDIA_UTC_OFFSET_MINUTES};
use crate::core::{AppError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Revenue predating the tracked records, in rupees
pub const DEFAULT_OPENING_BALANCE: i64 = 1_027_277;

/// Largest accepted business UTC offset, in minutes either side
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub reporting: ReportingConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// `json` for structured output, anything else for human-readable
    pub log_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    pub opening_balance: Decimal,
    /// Business timezone as minutes east of UTC
    pub utc_offset_minutes: i32,
}

impl ReportingConfig {
    pub fn clock(&self) -> Result<BusinessClock> {
        BusinessClock::new(self.utc_offset_minutes).map_err(AppError::Configuration)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Argon2 PHC hash of the admin token; `None` leaves the API open
    pub admin_token_hash: Option<String>,
}

/// Reads `key` and parses it, falling back to `default` when unset
pub(crate) fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}: '{}'", key, raw))),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            app: AppConfig {
                env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
                log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
            },
            database: DatabaseConfig::from_lookup(&lookup)?,
            server: ServerConfig::from_lookup(&lookup)?,
            reporting: ReportingConfig {
                opening_balance: parse_var(
                    &lookup,
                    "OPENING_BALANCE",
                    Decimal::from(DEFAULT_OPENING_BALANCE),
                )?,
                utc_offset_minutes: parse_var(
                    &lookup,
                    "BUSINESS_UTC_OFFSET_MINUTES",
                    INDIA_UTC_OFFSET_MINUTES,
                )?,
            },
            session: SessionConfig {
                admin_token_hash: lookup("ADMIN_TOKEN_HASH").filter(|h| !h.trim().is_empty()),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(AppError::Configuration(
                "DATABASE_MAX_CONNECTIONS must be greater than 0".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "SERVER_PORT must be greater than 0".to_string(),
            ));
        }

        if self.reporting.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(AppError::Configuration(format!(
                "BUSINESS_UTC_OFFSET_MINUTES must be within ±{}",
                MAX_UTC_OFFSET_MINUTES
            )));
        }

        if self.reporting.opening_balance < Decimal::ZERO {
            return Err(AppError::Configuration(
                "OPENING_BALANCE cannot be negative".to_string(),
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }
}
