//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the hospital API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Connection pool size (default: 5)
//! - `LOG_LEVEL`: Logging filter directive (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SESSION_TTL_HOURS`: Lifetime of login sessions (default: 12)
//! - `SLOT_LENGTH_MINUTES`: Appointment slot length (default: 30)
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD`: Bootstrap administrator account

use eyre::{eyre, Result, WrapErr};
use hospital_core::availability::DEFAULT_SLOT_LENGTH_MINUTES;
use std::env;

/// Longest slot length accepted from configuration.
pub const MAX_SLOT_LENGTH_MINUTES: u32 = 12 * 60;

/// Credentials for the administrator account created on first start.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration for the hospital API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use hospital_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub database_max_connections: u32,

    /// `tracing_subscriber::EnvFilter` directive, e.g. "info" or "hospital_api=debug"
    pub log_level: String,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// How long a login session stays valid
    pub session_ttl_hours: i64,

    /// Length of bookable appointment slots
    pub slot_length_minutes: u32,

    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - A numeric setting cannot be parsed
    /// - SLOT_LENGTH_MINUTES or SESSION_TTL_HOURS is out of range
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // Network settings
        let host = var("API_HOST", "0.0.0.0");
        let port = var("API_PORT", "3000")
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;
        let database_max_connections = var("DATABASE_MAX_CONNECTIONS", "5")
            .parse()
            .wrap_err("Invalid DATABASE_MAX_CONNECTIONS value")?;

        // Logging settings
        let log_level = var("LOG_LEVEL", "info");

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS", "30")
            .parse()
            .unwrap_or(30);

        // Scheduling and session settings
        let session_ttl_hours: i64 = var("SESSION_TTL_HOURS", "12")
            .parse()
            .wrap_err("Invalid SESSION_TTL_HOURS value")?;
        if session_ttl_hours <= 0 {
            return Err(eyre!("SESSION_TTL_HOURS must be positive"));
        }

        let slot_length_minutes: u32 = var(
            "SLOT_LENGTH_MINUTES",
            &DEFAULT_SLOT_LENGTH_MINUTES.to_string(),
        )
        .parse()
        .wrap_err("Invalid SLOT_LENGTH_MINUTES value")?;
        if !(1..=MAX_SLOT_LENGTH_MINUTES).contains(&slot_length_minutes) {
            return Err(eyre!(
                "SLOT_LENGTH_MINUTES must be between 1 and {}",
                MAX_SLOT_LENGTH_MINUTES
            ));
        }

        let bootstrap_admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            log_level,
            cors_origins,
            request_timeout,
            session_ttl_hours,
            slot_length_minutes,
            bootstrap_admin,
        })
    }

    /// Returns the server address as a string
    ///
    /// # Returns
    ///
    /// * `String` - Formatted server address (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
