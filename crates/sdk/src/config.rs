//! Client configuration and credential loading
//!
//! # Environment Variables
//!
//! - `API_KEY`: Crawlbyte API key
//! - `CRAWLBYTE_BASE_URL`: API root (default: `https://api.crawlbyte.ai/api`)
//! - `CRAWLBYTE_TIMEOUT_SECS`: per-request timeout in seconds (default: 30)

use crate::error::{Result, SdkError};
use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.crawlbyte.ai/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const API_KEY_ENV: &str = "API_KEY";
pub const BASE_URL_ENV: &str = "CRAWLBYTE_BASE_URL";
pub const TIMEOUT_ENV: &str = "CRAWLBYTE_TIMEOUT_SECS";

/// Transport settings for a client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("crawlbyte-sdk-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load overrides from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                SdkError::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    TIMEOUT_ENV, raw
                ))
            })?;
            if secs == 0 {
                return Err(SdkError::Config(format!(
                    "{} must be greater than zero",
                    TIMEOUT_ENV
                )));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Read the API key from `API_KEY`
pub fn api_key_from_env() -> Result<SecretString> {
    api_key_from_lookup(|key| std::env::var(key).ok())
}

pub fn api_key_from_lookup<F>(lookup: F) -> Result<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(API_KEY_ENV)
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
        .ok_or(SdkError::MissingCredential)
}
