//! Application configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! `main` calls `dotenvy::dotenv()` first, so a local `.env` file feeds the
//! same variables. Everything is parsed once at startup into [`AppConfig`];
//! handlers never read the environment directly.

use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};
use uuid::Uuid;

use crate::services::store::User;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_FRONTEND_DIR: &str = "./frontend";
pub const DEFAULT_FIXED_USER_NAME: &str = "Usuário";
/// São Paulo, which observes no daylight saving time.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = -3 * 3600;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Which resolution strategy the process runs with. Chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Validate tokens against `access_tokens` and load the user from `users`.
    Database,
    /// Development stub: every load resolves to this user without a lookup.
    Fixed(User),
}

/// Whether a validated token may authenticate more than one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPolicy {
    /// Tokens stay valid until `expires_at`.
    Reusable,
    /// Validation flips `used` to true in the same statement.
    SingleUse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub auth_mode: AuthMode,
    pub token_policy: TokenPolicy,
    pub cookie_secure: bool,
    pub frontend_dir: PathBuf,
    /// Wall clock used for "today", greetings and calendar days.
    pub utc_offset: FixedOffset,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `AUTH_MODE`: `database` (default) or `fixed`
    /// - `FIXED_USER_ID`, `FIXED_USER_NAME`, `FIXED_USER_PHONE`: user for `fixed` mode
    /// - `TOKEN_POLICY`: `reusable` (default) or `single_use`
    /// - `COOKIE_SECURE`: default false
    /// - `FRONTEND_DIR`: default `./frontend`
    /// - `UTC_OFFSET`: wall-clock offset such as `-03:00`, default `-03:00`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let port = env_parse("PORT", DEFAULT_PORT)?;
        let db_max_connections = env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let auth_mode = parse_auth_mode(std::env::var("AUTH_MODE").ok().as_deref())?;
        let token_policy = parse_token_policy(std::env::var("TOKEN_POLICY").ok().as_deref())?;
        let cookie_secure = env_bool("COOKIE_SECURE").unwrap_or(false);
        let frontend_dir = std::env::var("FRONTEND_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FRONTEND_DIR));
        let utc_offset = env_parse("UTC_OFFSET", default_utc_offset())?;

        Ok(Self {
            database_url,
            port,
            db_max_connections,
            auth_mode,
            token_policy,
            cookie_secure,
            frontend_dir,
            utc_offset,
        })
    }
}

#[must_use]
pub fn default_utc_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var: key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_auth_mode(raw: Option<&str>) -> Result<AuthMode, ConfigError> {
    match raw.unwrap_or("database") {
        "database" => Ok(AuthMode::Database),
        "fixed" => Ok(AuthMode::Fixed(fixed_user_from_env()?)),
        other => Err(ConfigError::Invalid { var: "AUTH_MODE", value: other.to_owned() }),
    }
}

fn fixed_user_from_env() -> Result<User, ConfigError> {
    let id = match std::env::var("FIXED_USER_ID") {
        Ok(raw) => Uuid::parse_str(raw.trim()).map_err(|_| ConfigError::Invalid { var: "FIXED_USER_ID", value: raw })?,
        Err(_) => Uuid::nil(),
    };
    let name = std::env::var("FIXED_USER_NAME").unwrap_or_else(|_| DEFAULT_FIXED_USER_NAME.to_owned());
    let phone = std::env::var("FIXED_USER_PHONE").unwrap_or_default();
    Ok(User { id, name, phone })
}

fn parse_token_policy(raw: Option<&str>) -> Result<TokenPolicy, ConfigError> {
    match raw.unwrap_or("reusable") {
        "reusable" => Ok(TokenPolicy::Reusable),
        "single_use" => Ok(TokenPolicy::SingleUse),
        other => Err(ConfigError::Invalid { var: "TOKEN_POLICY", value: other.to_owned() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
