//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `STOCKROOM_HOST` - Bind address (default: 0.0.0.0)
//! - `STOCKROOM_PORT` - Listen port (default: 3001)
//! - `JWT_SECRET` - Token signing secret (default: insecure dev value, logged as a warning)
//! - `STOCKROOM_BCRYPT_COST` - bcrypt cost for seeded users, 4..=31 (default: 10)
//! - `STOCKROOM_SEED_PRODUCTS` - Load the demo products at startup (default: true)
//! - `STOCKROOM_LOG_FORMAT` - `json` or `pretty` (default: json)
//! - `RUST_LOG` - Tracing filter (default: info)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use stockroom_observability::LogFormat;

const DEV_JWT_SECRET: &str = "stockroom-dev-secret-change-me";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_BCRYPT_COST: u32 = 10;
const BCRYPT_COST_RANGE: core::ops::RangeInclusive<u32> = 4..=31;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API service configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Set when `JWT_SECRET` was absent and the dev default is in use
    pub jwt_secret_is_default: bool,
    /// bcrypt cost used when hashing seeded passwords
    pub bcrypt_cost: u32,
    /// Whether the catalog starts with the demo products
    pub seed_products: bool,
    /// Log output format
    pub log_format: LogFormat,
}

impl ApiConfig {
    /// Defaults with an explicit signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            jwt_secret: SecretString::from(jwt_secret.into()),
            jwt_secret_is_default: false,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            seed_products: true,
            log_format: LogFormat::default(),
        }
    }

    /// Load configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (jwt_secret, jwt_secret_is_default) = match lookup("JWT_SECRET") {
            Some(s) if s.trim().is_empty() => {
                return Err(invalid("JWT_SECRET", "must not be empty"));
            }
            Some(s) => (s, false),
            None => (DEV_JWT_SECRET.to_string(), true),
        };

        let mut config = Self::new(jwt_secret);
        config.jwt_secret_is_default = jwt_secret_is_default;

        if let Some(host) = lookup("STOCKROOM_HOST") {
            config.host = host
                .parse()
                .map_err(|e: std::net::AddrParseError| invalid("STOCKROOM_HOST", e))?;
        }
        if let Some(port) = lookup("STOCKROOM_PORT") {
            config.port = port
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("STOCKROOM_PORT", e))?;
        }
        if let Some(cost) = lookup("STOCKROOM_BCRYPT_COST") {
            let cost: u32 = cost
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("STOCKROOM_BCRYPT_COST", e))?;
            if !BCRYPT_COST_RANGE.contains(&cost) {
                return Err(invalid("STOCKROOM_BCRYPT_COST", "must be between 4 and 31"));
            }
            config.bcrypt_cost = cost;
        }
        if let Some(seed) = lookup("STOCKROOM_SEED_PRODUCTS") {
            config.seed_products = parse_bool(&seed)
                .ok_or_else(|| invalid("STOCKROOM_SEED_PRODUCTS", "expected true or false"))?;
        }
        if let Some(format) = lookup("STOCKROOM_LOG_FORMAT") {
            config.log_format = format
                .parse()
                .map_err(|e: String| invalid("STOCKROOM_LOG_FORMAT", e))?;
        }

        Ok(config)
    }

    /// Returns the socket address for binding the server.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn invalid(key: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
