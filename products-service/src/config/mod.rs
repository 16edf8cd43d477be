use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    /// Seconds between liveness pings once a connection is established.
    pub health_interval_secs: u64,
}

impl ProductsConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(ProductsConfig {
            common: common_config,
            mongodb: MongoConfig::from_lookup(|key| env::var(key).ok(), is_prod)?,
        })
    }
}

impl MongoConfig {
    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs.max(1))
    }

    /// Only the URI is mandatory in production; the database name and ping
    /// interval always have defaults.
    fn from_lookup<F>(lookup: F, is_prod: bool) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(MongoConfig {
            uri: get_env(&lookup, "MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
            database: get_env(&lookup, "MONGODB_DATABASE", Some("products"), false)?,
            health_interval_secs: get_env(
                &lookup,
                "MONGODB_HEALTH_INTERVAL_SECS",
                Some("10"),
                false,
            )?
            .parse()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "MONGODB_HEALTH_INTERVAL_SECS must be a whole number of seconds: {}",
                    e
                ))
            })?,
        })
    }
}

fn get_env<F>(
    lookup: &F,
    key: &str,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
