//! Service configuration from environment variables

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

/// Everything the service reads from the environment at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the text-generation service; checked by the service, not here
    pub api_key: Option<String>,
    pub model: String,
    /// LLM gateway base URL; when set the key is not sent
    pub gateway: Option<String>,
    pub port: u16,
    pub system_prompt_path: Option<PathBuf>,
    pub request_timeout: Duration,
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            model: get("SUMMIT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gateway: get("LLM_GATEWAY"),
            port: parse_number("SUMMIT_PORT", get("SUMMIT_PORT"), DEFAULT_PORT)?,
            system_prompt_path: get("SUMMIT_SYSTEM_PROMPT_PATH").map(PathBuf::from),
            request_timeout: Duration::from_secs(parse_positive(
                "SUMMIT_REQUEST_TIMEOUT_SECS",
                get("SUMMIT_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            session_ttl: Duration::from_secs(parse_number(
                "SUMMIT_SESSION_TTL_SECS",
                get("SUMMIT_SESSION_TTL_SECS"),
                DEFAULT_SESSION_TTL_SECS,
            )?),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value: v }),
    }
}

/// Like [`parse_number`], but zero is an error
fn parse_positive(var: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match parse_number(var, value, default)? {
        0 => Err(ConfigError::Zero { var }),
        n => Ok(n),
    }
}
