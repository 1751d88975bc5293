use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_CONTACT_EMAIL: &str = "contacto@autocatalog.local";
pub const DEFAULT_CATALOG_QUERY_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Service configuration, read once at start-up.
///
/// | Env Var                    | Default                      |
/// |----------------------------|------------------------------|
/// | `DATABASE_URL`             | `sqlite::memory:`            |
/// | `BIND_ADDR`                | `0.0.0.0:3000`               |
/// | `ADMIN_API_TOKEN`          | required                     |
/// | `CONTACT_EMAIL`            | `contacto@autocatalog.local` |
/// | `CATALOG_QUERY_TIMEOUT_MS` | `5000`                       |
/// | `LOG_FORMAT`               | `pretty` (`json` accepted)   |
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub admin_token: String,
    /// Stored as the sender address of general contact-form inquiries.
    pub contact_email: String,
    pub catalog_query_timeout: Duration,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("bind_addr", &self.bind_addr)
            .field("admin_token", &"<redacted>")
            .field("contact_email", &self.contact_email)
            .field("catalog_query_timeout", &self.catalog_query_timeout)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any key lookup.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when `ADMIN_API_TOKEN` is absent or blank,
    /// [`ConfigError::Invalid`] when a value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let raw_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse().map_err(|err: std::net::AddrParseError| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: raw_addr.clone(),
            reason: err.to_string(),
        })?;

        let admin_token = get("ADMIN_API_TOKEN").ok_or(ConfigError::Missing("ADMIN_API_TOKEN"))?;

        let contact_email = get("CONTACT_EMAIL").unwrap_or_else(|| DEFAULT_CONTACT_EMAIL.to_string());

        let catalog_query_timeout = match get("CATALOG_QUERY_TIMEOUT_MS") {
            None => Duration::from_millis(DEFAULT_CATALOG_QUERY_TIMEOUT_MS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: "CATALOG_QUERY_TIMEOUT_MS",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Err(err) => {
                    return Err(ConfigError::Invalid {
                        name: "CATALOG_QUERY_TIMEOUT_MS",
                        value: raw,
                        reason: err.to_string(),
                    });
                }
            },
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            database_url,
            bind_addr,
            admin_token,
            contact_email,
            catalog_query_timeout,
            log_format,
        })
    }

    /// Whether the database lives only as long as the process.
    #[must_use]
    pub fn is_ephemeral_database(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// In-memory defaults with the given admin token. Used by tests and tools.
    #[must_use]
    pub fn with_admin_token(token: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            admin_token: token.into(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            catalog_query_timeout: Duration::from_millis(DEFAULT_CATALOG_QUERY_TIMEOUT_MS),
            log_format: LogFormat::Pretty,
        }
    }
}
