use std::{net::SocketAddr, time::Duration};

use thiserror::Error;

use crate::loader::DEFAULT_API_BASE;

pub const BIND: &str = "BUSBOARD_BIND";
pub const API_BASE: &str = "STRIDE_API_BASE";
pub const TIMEOUT_SECS: &str = "STRIDE_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is not a valid socket address: {value}")]
    Bind { key: &'static str, value: String },
    #[error("{key} must be an http(s) url, got {value}")]
    ApiBase { key: &'static str, value: String },
    #[error("{key} must be a whole number of seconds above zero, got {value}")]
    Timeout { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: SocketAddr,
    pub api_base: String,
    pub timeout: Duration,
}

impl Config {
    /// Reads the process environment. A `.env` file is picked up first when
    /// one exists.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let bind = lookup(BIND).unwrap_or_else(|| "0.0.0.0:8080".to_owned());
        let bind = bind
            .parse()
            .map_err(|_| ConfigError::Bind { key: BIND, value: bind })?;

        let api_base = lookup(API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
        if !crate::registry::is_external(&api_base) {
            return Err(ConfigError::ApiBase { key: API_BASE, value: api_base });
        }
        let api_base = api_base.trim_end_matches('/').to_owned();

        let timeout = match lookup(TIMEOUT_SECS) {
            None => Duration::from_secs(10),
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Timeout { key: TIMEOUT_SECS, value }),
            },
        };

        Ok(Config {
            bind,
            api_base,
            timeout,
        })
    }
}
