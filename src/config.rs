use std::env;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("JWT_SECRET and JWT_REFRESH_SECRET must differ")]
    SharedSecret,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub pool_size: u32,
    pub db_timeout_secs: u64,
    pub auth: AuthConfig,
}

/// Token signing material and lifetimes.
#[derive(Clone)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
    pub rotate_refresh_tokens: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:fittrack.db".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 3000),
            pool_size: parse_or("DB_POOL_SIZE", 5),
            db_timeout_secs: parse_or("DB_TIMEOUT_SEC", 5),
            auth: AuthConfig::from_env()?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        let refresh_secret = env::var("JWT_REFRESH_SECRET")
            .map_err(|_| ConfigError::Missing("JWT_REFRESH_SECRET"))?;

        let config = Self {
            access_secret,
            refresh_secret,
            access_ttl_secs: parse_or("JWT_EXPIRES_IN_SEC", 900),
            refresh_ttl_secs: parse_or("JWT_REFRESH_EXPIRES_IN_SEC", 604_800),
            rotate_refresh_tokens: parse_or("ROTATE_REFRESH_TOKENS", false),
        };
        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.access_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.refresh_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_REFRESH_SECRET"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(ConfigError::SharedSecret);
        }
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
