//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL; `https://` enables secure cookies
//!   (default: <http://localhost:3000>)
//! - `CATALOG_SOURCE` - `api` or `file` (default: api)
//! - `CATALOG_API_URL` - Product API base URL (default: <https://moritotabi.com/api>)
//! - `CATALOG_FILE_PATH` - Static catalog file (default: public/products.json)
//! - `CATALOG_REQUEST_TIMEOUT_SECS` - Product API timeout (default: 30)
//! - `CATALOG_CACHE_TTL_SECS` - Product response cache TTL (default: 3600)
//! - `CATALOG_CACHE_CAPACITY` - Product response cache entries (default: 1000)
//! - `CATALOG_PAGE_SIZE` - Default listing page size (default: 25)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use cosmopolitan_core::catalog::MAX_PAGE_LIMIT;
use thiserror::Error;

/// Default product API base URL.
pub const DEFAULT_CATALOG_API_URL: &str = "https://moritotabi.com/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Where products come from
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
}

/// Which backing store serves product listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Remote REST product API.
    Api { base_url: String },
    /// Static `{ "products": [...] }` JSON file.
    File { path: PathBuf },
}

/// Product catalog configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub source: CatalogSource,
    /// Timeout for outbound product API requests
    pub request_timeout: Duration,
    /// How long product responses stay cached
    pub cache_ttl: Duration,
    /// Maximum cached product responses
    pub cache_capacity: u64,
    /// Page size used when a request does not specify one
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::Api {
                base_url: DEFAULT_CATALOG_API_URL.to_string(),
            },
            request_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(3600),
            cache_capacity: 1000,
            page_size: 25,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parse_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parse_or("STOREFRONT_PORT", 3000_u16)?;
        let base_url = env.get_or("STOREFRONT_BASE_URL", "http://localhost:3000");
        let catalog = CatalogConfig::from_env(&env)?;

        Ok(Self {
            host,
            port,
            base_url,
            catalog,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CatalogConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = match env.get_or("CATALOG_SOURCE", "api").to_lowercase().as_str() {
            "api" => CatalogSource::Api {
                base_url: env
                    .get_or("CATALOG_API_URL", DEFAULT_CATALOG_API_URL)
                    .trim_end_matches('/')
                    .to_string(),
            },
            "file" => CatalogSource::File {
                path: PathBuf::from(env.get_or("CATALOG_FILE_PATH", "public/products.json")),
            },
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "CATALOG_SOURCE".to_string(),
                    format!("expected 'api' or 'file', got '{other}'"),
                ));
            }
        };

        if let CatalogSource::Api { base_url } = &source {
            url::Url::parse(base_url).map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e.to_string())
            })?;
        }

        let page_size: u32 = env.parse_or("CATALOG_PAGE_SIZE", 25)?;
        if page_size == 0 || page_size > MAX_PAGE_LIMIT {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_PAGE_SIZE".to_string(),
                format!("must be between 1 and {MAX_PAGE_LIMIT}"),
            ));
        }

        Ok(Self {
            source,
            request_timeout: Duration::from_secs(env.parse_or("CATALOG_REQUEST_TIMEOUT_SECS", 30)?),
            cache_ttl: Duration::from_secs(env.parse_or("CATALOG_CACHE_TTL_SECS", 3600)?),
            cache_capacity: env.parse_or("CATALOG_CACHE_CAPACITY", 1000)?,
            page_size,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment variable lookup.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating empty values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}
