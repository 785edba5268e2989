//! Service configuration
//!
//! Read from environment variables at startup:
//!
//! - `AEROLEDGER_ADMIN_ADDRESS` (required): administrator address, fixed for
//!   the lifetime of the ledger
//! - `AEROLEDGER_PORT`: listen port, default 8080
//! - `AEROLEDGER_NAME`: human-readable name of this ledger
//! - `AEROLEDGER_DATABASE_URL`: PostgreSQL journal (only with the `postgres` feature)
//! - `AEROLEDGER_LOG_LEVEL`: tracing level, default `info`

use aeroledger_core::Address;
use std::env;
use thiserror::Error;
use tracing::Level;

pub const ADMIN_VAR: &str = "AEROLEDGER_ADMIN_ADDRESS";
pub const PORT_VAR: &str = "AEROLEDGER_PORT";
pub const NAME_VAR: &str = "AEROLEDGER_NAME";
pub const DATABASE_URL_VAR: &str = "AEROLEDGER_DATABASE_URL";
pub const LOG_LEVEL_VAR: &str = "AEROLEDGER_LOG_LEVEL";

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Ledger service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub admin: Address,
    pub port: u16,
    pub name: Option<String>,
    pub database_url: Option<String>,
    pub log_level: Level,
}

impl ServiceConfig {
    /// Configuration for an in-memory ledger with defaults
    pub fn new(admin: impl Into<Address>) -> Self {
        Self {
            admin: admin.into(),
            port: DEFAULT_PORT,
            name: None,
            database_url: None,
            log_level: Level::INFO,
        }
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load using `lookup` to resolve variable names
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let admin = non_empty(ADMIN_VAR).ok_or(ConfigError::Missing(ADMIN_VAR))?;

        let port = match non_empty(PORT_VAR) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: PORT_VAR,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let log_level = match non_empty(LOG_LEVEL_VAR) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: LOG_LEVEL_VAR,
                value,
            })?,
            None => Level::INFO,
        };

        Ok(Self {
            admin: Address::new(admin),
            port,
            name: non_empty(NAME_VAR),
            database_url: non_empty(DATABASE_URL_VAR),
            log_level,
        })
    }
}
