//! Application configuration read from the environment at startup.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CATALOG_BASE_URL: &str = "https://pokeapi.co/api/v2/";
const DEFAULT_CATALOG_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// Runtime configuration for the HTTP server and its collaborators.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Shared secret for signing bearer tokens.
    pub jwt_secret: String,
    /// Bearer token lifetime.
    pub token_ttl: Duration,
    /// Base URL of the external creature catalog.
    pub catalog_base_url: Url,
    /// Fixed per-call catalog request timeout.
    pub catalog_timeout: Duration,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn seconds_var(key: &str, default: u64) -> Result<Duration, String> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| format!("{key} must be a number of seconds, got '{raw}'")),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// `DATABASE_URL` is required. `JWT_SECRET` is required in release
    /// builds; debug builds fall back to an ephemeral secret so local
    /// development works out of the box (tokens die with the process).
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = env_or("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|error| format!("BIND_ADDR is not a socket address: {error}"))?;

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_owned())?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if cfg!(debug_assertions) => {
                warn!("JWT_SECRET not set, using an ephemeral secret (dev only)");
                uuid::Uuid::new_v4().to_string()
            }
            _ => return Err("JWT_SECRET must be set".to_owned()),
        };

        let token_ttl = seconds_var("TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;

        let catalog_base_url = Url::parse(&env_or("CATALOG_BASE_URL", DEFAULT_CATALOG_BASE_URL))
            .map_err(|error| format!("CATALOG_BASE_URL is not a URL: {error}"))?;
        let catalog_timeout =
            seconds_var("CATALOG_TIMEOUT_SECONDS", DEFAULT_CATALOG_TIMEOUT_SECONDS)?;

        Ok(Self {
            bind_addr,
            database_url,
            jwt_secret,
            token_ttl,
            catalog_base_url,
            catalog_timeout,
        })
    }
}
