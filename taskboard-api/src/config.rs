/// Configuration management for the API server
///
/// Configuration is read from environment variables (a `.env` file is loaded
/// first when present).
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (unset = in-memory storage)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated origins, `*` for any (default: *)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `SESSION_SECRET`: Session signing secret, at least 32 characters (required)
/// - `SESSION_TTL_DAYS`: Session lifetime, 1 to 3650 (default: 30)
/// - `COOKIE_SECURE`: Marks the session cookie `Secure` (default: false)
/// - `PASSWORD_HASH_COST`: `default` or `low` (default: default)
/// - `PROVIDER_CALLBACK_SECRET`: Enables the provider sign-in callback
/// - `RUST_LOG` / `LOG_FORMAT`: Log filter and `json` output
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::str::FromStr;

use anyhow::Context;
use taskboard_shared::auth::password::HashCost;

/// Minimum length of `SESSION_SECRET`
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime (ten years)
pub const MAX_TTL_DAYS: i64 = 3650;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,

    /// None = in-memory storage
    pub database: Option<DatabaseConfig>,

    pub session: SessionConfig,

    pub auth: AuthConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Session token and cookie configuration
#[derive(Clone)]
pub struct SessionConfig {
    /// HS256 signing secret
    pub secret: String,

    pub ttl_days: i64,

    /// Send the cookie over HTTPS only
    pub cookie_secure: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("ttl_days", &self.ttl_days)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

/// Credential configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub hash_cost: HashCost,

    /// Bearer secret of the trusted provider sign-in callback; None disables it
    pub provider_callback_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("hash_cost", &self.hash_cost)
            .field("provider_callback", &self.provider_callback_secret.is_some())
            .finish()
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `SESSION_SECRET` is missing or too short, or any
    /// variable has an invalid value
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "API_PORT", 8080u16)?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?,
            }),
            None => None,
        };

        let secret = lookup("SESSION_SECRET").context("SESSION_SECRET environment variable is required")?;
        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SESSION_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        let ttl_days = parse_or(&lookup, "SESSION_TTL_DAYS", 30i64)?;
        if !(1..=MAX_TTL_DAYS).contains(&ttl_days) {
            anyhow::bail!("SESSION_TTL_DAYS must be between 1 and {}", MAX_TTL_DAYS);
        }

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production: parse_or(&lookup, "PRODUCTION", false)?,
            },
            database,
            session: SessionConfig {
                secret,
                ttl_days,
                cookie_secure: parse_or(&lookup, "COOKIE_SECURE", false)?,
            },
            auth: AuthConfig {
                hash_cost: parse_or(&lookup, "PASSWORD_HASH_COST", HashCost::default())?,
                provider_callback_secret: lookup("PROVIDER_CALLBACK_SECRET").filter(|s| !s.is_empty()),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
