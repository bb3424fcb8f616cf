//! Process configuration, read once at startup from the environment.

use std::fmt::Display;
use std::str::FromStr;

use roster_core::grid::{DEFAULT_ROWS_PER_PAGE, DEFAULT_SIGNATURE_MAX_AGE_SECS};

use crate::auth::jwt::JwtConfig;

/// Listener, CORS and timeout settings plus the session and grid sections.
///
/// | Env Var                | Default                 |
/// |------------------------|-------------------------|
/// | `HOST`                 | `0.0.0.0`               |
/// | `PORT`                 | `3000`                  |
/// | `CORS_ORIGINS`         | `http://localhost:3000` |
/// | `REQUEST_TIMEOUT_SECS` | `30`                    |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma separated in `CORS_ORIGINS`; blanks are dropped.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub grid: GridConfig,
}

/// Paging and state-cookie settings shared by every SimpleTable grid.
///
/// | Env Var                          | Default         |
/// |----------------------------------|-----------------|
/// | `SESSION_SECRET_KEY`             | none, required  |
/// | `SIMPLE_TABLE_ROWS_PER_PAGE`     | `15`            |
/// | `SIMPLE_TABLE_SIGNATURE_MAX_AGE` | `3600`          |
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// HMAC key for grid state cookies.
    pub session_secret_key: String,
    pub rows_per_page: i64,
    pub signature_max_age_secs: i64,
}

/// Parse `name` if set, otherwise fall back to `default`.
///
/// # Panics
///
/// Panics when the variable is set but does not parse as `T`.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

impl ServerConfig {
    /// # Panics
    ///
    /// Panics on malformed values and on a missing `JWT_SECRET` or
    /// `SESSION_SECRET_KEY`.
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            grid: GridConfig::from_env(),
        }
    }
}

impl GridConfig {
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET_KEY` is missing or empty, or the page size
    /// is not positive.
    pub fn from_env() -> Self {
        let session_secret_key = std::env::var("SESSION_SECRET_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .expect("SESSION_SECRET_KEY must be set to a non-empty value");

        let rows_per_page = env_or("SIMPLE_TABLE_ROWS_PER_PAGE", DEFAULT_ROWS_PER_PAGE);
        assert!(rows_per_page > 0, "SIMPLE_TABLE_ROWS_PER_PAGE must be positive");

        Self {
            session_secret_key,
            rows_per_page,
            signature_max_age_secs: env_or(
                "SIMPLE_TABLE_SIGNATURE_MAX_AGE",
                DEFAULT_SIGNATURE_MAX_AGE_SECS,
            ),
        }
    }
}
