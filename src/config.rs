use anyhow::{Context, Result};
use std::env;
use tracing::debug;

pub const ENV_HOST: &str = "RATEWATCH_DB_HOST";
pub const ENV_USER: &str = "RATEWATCH_DB_USER";
pub const ENV_PASS: &str = "RATEWATCH_DB_PASS";

/// Backend connection settings, sourced from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the record store, e.g. `https://rates.example.com`.
    pub host: String,
    /// Admin identity for the password grant.
    pub identity: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        debug!("Loading config from environment");
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the config from a variable lookup. All three variables are
    /// required; a missing or empty one fails before any network call.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |name: &str| -> Result<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .with_context(|| format!("Required environment variable {name} is not set"))
        };

        let config = AppConfig {
            host: require(ENV_HOST)?.trim_end_matches('/').to_string(),
            identity: require(ENV_USER)?,
            password: require(ENV_PASS)?,
        };
        debug!("Successfully loaded config for host {}", config.host);
        Ok(config)
    }
}
