//! Process configuration read from the environment.

use crate::team::services::MembershipPolicy;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_TEAM_SIZE: usize = 4;
const DEFAULT_APP_URL: &str = "http://localhost:8000/";
const DEFAULT_MAIL_SENDER: &str = "no-reply@function-junction.local";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 10;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable holds a value that cannot be used.
    #[error("invalid {key} '{value}': {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
        /// What was expected instead.
        reason: &'static str,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// HMAC secret used to verify bearer tokens.
    pub jwt_secret: String,
    /// Bind host.
    pub server_host: String,
    /// Bind port.
    pub server_port: u16,
    /// Accepted members a team may hold, creator included.
    pub team_size: usize,
    /// Base URL used in notification links, always ending in `/`.
    pub app_url: String,
    /// Sender address used when no user address applies.
    pub mail_sender: String,
    /// Deadline placed on every request context.
    pub request_timeout: Duration,
    /// Upper bound on one notification dispatch.
    pub notify_timeout: Duration,
    /// Connection pool size.
    pub max_db_connections: u32,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let jwt_secret = required(&lookup, "JWT_SECRET")?;
        let server_host =
            lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_owned());
        let server_port = parsed(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT, "expected a port")?;

        let team_size = parsed(&lookup, "TEAM_SIZE", DEFAULT_TEAM_SIZE, "expected an integer")?;
        if team_size == 0 {
            return Err(ConfigError::Invalid {
                key: "TEAM_SIZE",
                value: team_size.to_string(),
                reason: "must be at least 1",
            });
        }

        let mut app_url = lookup("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_owned());
        if !app_url.ends_with('/') {
            app_url.push('/');
        }
        let mail_sender =
            lookup("MAIL_SENDER").unwrap_or_else(|| DEFAULT_MAIL_SENDER.to_owned());

        let request_timeout = Duration::from_secs(parsed(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
            "expected seconds",
        )?);
        let notify_timeout = Duration::from_secs(parsed(
            &lookup,
            "NOTIFY_TIMEOUT_SECS",
            DEFAULT_NOTIFY_TIMEOUT_SECS,
            "expected seconds",
        )?);
        let max_db_connections = parsed(
            &lookup,
            "MAX_DB_CONNECTIONS",
            DEFAULT_MAX_DB_CONNECTIONS,
            "expected a positive integer",
        )?;

        Ok(Self {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            team_size,
            app_url,
            mail_sender,
            request_timeout,
            notify_timeout,
            max_db_connections,
        })
    }

    /// Returns the `host:port` bind address.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Returns the membership rules derived from this configuration.
    #[must_use]
    pub fn membership_policy(&self) -> MembershipPolicy {
        MembershipPolicy::new(self.team_size, self.app_url.clone())
            .with_notify_timeout(self.notify_timeout)
    }

    /// Returns the database URL with credentials masked, for logging.
    #[must_use]
    pub fn redacted_database_url(&self) -> String {
        let url = &self.database_url;
        match (url.find("://"), url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***{}", &url[..scheme_end], &url[at..])
            }
            _ => url.clone(),
        }
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    reason: &'static str,
) -> Result<T, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw,
        reason,
    })
}
