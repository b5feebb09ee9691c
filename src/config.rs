//! # Configuration Management
//!
//! This module handles loading configuration from environment variables.
//! Configuration comes from the environment (optionally seeded from a `.env` file).
//!
//! ## Environment Variables
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 8000)
//! - `DATABASE_URL`: SQLite database connection string
//! - `JWT_SECRET`: Symmetric secret used to sign bearer tokens
//! - `TOKEN_TTL_HOURS`: Validity window of issued tokens (default: 168)
//! - `REQUEST_TIMEOUT_SECS`: Upper bound on a single request (default: 30)
//! - `ADMIN_EMAIL`: Account promoted to admin at startup (optional)
//! - `CORS_ORIGINS`: Comma-separated allowed origins (optional, default: any)

use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;

/// Secret used when `JWT_SECRET` is unset in a debug build.
const DEV_JWT_SECRET: &str = "dev-only-secret-change-me";

/// Application configuration
///
/// Holds every value needed to run the server. All fields are public so the
/// router and state builders can read them directly.
#[derive(Clone)]
pub struct Config {
    /// Server host/IP address to bind to
    /// Examples: "127.0.0.1" (localhost only), "0.0.0.0" (all interfaces)
    pub host: String,

    /// Server port number
    pub port: u16,

    /// SQLite database connection URL
    /// Format: "sqlite:filename.db?mode=rwc" (read, write, create)
    pub database_url: String,

    /// HMAC secret for signing and verifying bearer tokens
    pub jwt_secret: String,

    /// How long an issued token stays valid
    pub token_ttl: Duration,

    /// Per-request timeout applied to the whole router
    pub request_timeout: Duration,

    /// Email of the account that is ensured to hold the admin role
    pub admin_email: Option<String>,

    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
}

// The secret never goes to the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("request_timeout", &self.request_timeout)
            .field("admin_email", &self.admin_email)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads variables from .env file (if present) using dotenvy
    /// 2. Reads each configuration value from environment
    /// 3. Falls back to defaults where a default is safe
    /// 4. Returns an error if parsing fails or `JWT_SECRET` is missing in a release build
    ///
    /// ## Example .env file
    /// ```text
    /// HOST=127.0.0.1
    /// PORT=8000
    /// DATABASE_URL=sqlite:tutoring.db?mode=rwc
    /// JWT_SECRET=change-me
    /// ADMIN_EMAIL=admin@example.com
    /// ```
    pub fn from_env() -> Result<Self> {
        // dotenvy doesn't error if the file is missing
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
            _ => bail!("JWT_SECRET must be set"),
        };

        let token_ttl_hours: u64 = env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "168".to_string())
            .parse()
            .context("TOKEN_TTL_HOURS must be a whole number of hours")?;

        let request_timeout_secs: u64 = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),

            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("PORT must be a valid port number")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:tutoring.db?mode=rwc".to_string()),

            jwt_secret,
            token_ttl: token_ttl(token_ttl_hours)?,
            request_timeout: Duration::from_secs(request_timeout_secs),

            admin_email: env::var("ADMIN_EMAIL")
                .ok()
                .map(|email| email.trim().to_lowercase())
                .filter(|email| !email.is_empty()),

            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
        })
    }

    /// Get the socket address to bind the server to, e.g. "127.0.0.1:8000"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
impl Config {
    /// Configuration for in-process tests: in-memory database, fixed secret.
    pub fn for_tests() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            token_ttl: Duration::from_secs(3600),
            request_timeout: Duration::from_secs(5),
            admin_email: None,
            cors_origins: Vec::new(),
        }
    }
}

fn token_ttl(hours: u64) -> anyhow::Result<Duration> {
    hours
        .checked_mul(3600)
        .map(Duration::from_secs)
        .with_context(|| format!("TOKEN_TTL_HOURS={} is too large", hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = parse_origins(" http://localhost:5173 ,, https://example.com ");
        assert_eq!(origins, vec!["http://localhost:5173", "https://example.com"]);
    }

    #[test]
    fn token_ttl_is_counted_in_hours() {
        assert_eq!(token_ttl(168).unwrap(), Duration::from_secs(168 * 3600));
    }

    #[test]
    fn oversized_token_ttl_is_an_error() {
        let err = token_ttl(u64::MAX).unwrap_err();
        assert!(err.to_string().contains("TOKEN_TTL_HOURS"));
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let rendered = format!("{:?}", Config::for_tests());
        assert!(!rendered.contains("test-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
