//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::str::FromStr;

use inventory_core::PricingPolicy;
use serde::Deserialize;

/// Largest worker id that fits the 10-bit Snowflake worker field
const MAX_WORKER_ID: u16 = 1023;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    /// `None` runs the service on the in-memory store
    pub database: Option<DatabaseConfig>,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub ledger: LedgerConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Stock ledger behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Extra attempts after an optimistic-lock conflict
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Maximum entries accepted by one batch call
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
    #[serde(default)]
    pub pricing_policy: PricingPolicy,
    /// Audit entries older than this are purged by the housekeeping endpoint
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            batch_limit: default_batch_limit(),
            pricing_policy: PricingPolicy::default(),
            log_retention_days: default_log_retention_days(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "inventory-ledger".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_max_retries() -> u32 {
    3
}

fn default_batch_limit() -> usize {
    1000
}

fn default_log_retention_days() -> i64 {
    90
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let database = match vars.get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: vars
                    .parse("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: vars
                    .parse("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            }),
            None => None,
        };

        let worker_id: u16 = vars.parse("WORKER_ID")?.unwrap_or(0);
        if worker_id > MAX_WORKER_ID {
            return Err(ConfigError::InvalidValue(
                "WORKER_ID",
                format!("{worker_id} exceeds {MAX_WORKER_ID}"),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars.parse("APP_ENV")?.unwrap_or_default(),
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(default_host),
                port: vars
                    .parse("API_PORT")?
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database,
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: vars.parse("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig { worker_id },
            ledger: LedgerConfig {
                max_retries: vars
                    .parse("LEDGER_MAX_RETRIES")?
                    .unwrap_or_else(default_max_retries),
                batch_limit: vars
                    .parse("LEDGER_BATCH_LIMIT")?
                    .unwrap_or_else(default_batch_limit),
                pricing_policy: vars.parse("INBOUND_PRICING_POLICY")?.unwrap_or_default(),
                log_retention_days: vars
                    .parse("LOG_RETENTION_DAYS")?
                    .unwrap_or_else(default_log_retention_days),
            },
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn parse<T>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string()))
            })
            .transpose()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_defaults_with_only_port() {
        let config = load(&[("API_PORT", "3000")]).unwrap();
        assert_eq!(config.app.name, "inventory-ledger");
        assert_eq!(config.app.env, Environment::Development);
        assert_eq!(config.api.address(), "127.0.0.1:3000");
        assert!(config.database.is_none());
        assert_eq!(config.ledger.max_retries, 3);
        assert_eq!(config.ledger.batch_limit, 1000);
        assert_eq!(config.ledger.pricing_policy, PricingPolicy::WeightedAverage);
        assert_eq!(config.ledger.log_retention_days, 90);
    }

    #[test]
    fn test_missing_port_is_error() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingVar("API_PORT"))));
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let err = load(&[("API_PORT", "3000"), ("LEDGER_MAX_RETRIES", "many")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("LEDGER_MAX_RETRIES", _)));

        let err = load(&[("API_PORT", "3000"), ("INBOUND_PRICING_POLICY", "fifo")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("INBOUND_PRICING_POLICY", _)));

        let err = load(&[("API_PORT", "3000"), ("WORKER_ID", "1024")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("WORKER_ID", _)));
    }

    #[test]
    fn test_full_configuration() {
        let config = load(&[
            ("API_PORT", "8080"),
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://localhost/inventory"),
            ("DATABASE_MAX_CONNECTIONS", "8"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("WORKER_ID", "7"),
            ("INBOUND_PRICING_POLICY", "last_price"),
            ("LOG_RETENTION_DAYS", "30"),
        ])
        .unwrap();

        assert!(config.app.env.is_production());
        let database = config.database.unwrap();
        assert_eq!(database.max_connections, 8);
        assert_eq!(database.min_connections, 5);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.snowflake.worker_id, 7);
        assert_eq!(config.ledger.pricing_policy, PricingPolicy::LastPrice);
        assert_eq!(config.ledger.log_retention_days, 30);
    }
}
