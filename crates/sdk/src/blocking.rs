//! Blocking Client
//!
//! Wraps the async client and drives it on a private current-thread runtime.
//! That runtime only runs inside `block_on`, so pooled connections would go
//! stale unnoticed between calls; every call opens a fresh connection.
//! Must not be used (or dropped) from inside an async context.

use crate::client::CrawlbyteClient as AsyncClient;
use crate::config::{self, ClientConfig};
use crate::error::{Result, SdkError};
use crate::types::{TaskResponse, TaskSpec};
use secrecy::SecretString;
use tokio::runtime::{Builder, Runtime};

/// Blocking Crawlbyte API Client
///
/// # Example
///
/// ```no_run
/// use crawlbyte_sdk::blocking::CrawlbyteClient;
/// use crawlbyte_sdk::TaskSpec;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CrawlbyteClient::new("cb_live_...")?;
/// let task = client.create_task(&TaskSpec::universal(["https://example.com"]))?;
/// assert!(task.contains_key("id"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CrawlbyteClient {
    inner: AsyncClient,
    runtime: Runtime,
}

impl CrawlbyteClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Result<Self> {
        Self::with_secret(SecretString::from(api_key.into()), config)
    }

    pub fn with_secret(api_key: SecretString, config: ClientConfig) -> Result<Self> {
        let inner = AsyncClient::build(api_key, config, false)?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SdkError::Config(format!("Failed to start runtime: {}", e)))?;

        Ok(Self { inner, runtime })
    }

    /// Build a client from `API_KEY`, `CRAWLBYTE_BASE_URL` and `CRAWLBYTE_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::with_secret(config::api_key_from_env()?, ClientConfig::from_env()?)
    }

    pub fn tasks_url(&self) -> &reqwest::Url {
        self.inner.tasks_url()
    }

    /// Create a crawl task, blocking until the service answers.
    ///
    /// Same contract as the async [`create_task`](AsyncClient::create_task).
    pub fn create_task(&self, spec: &TaskSpec) -> Result<TaskResponse> {
        self.runtime.block_on(self.inner.create_task(spec))
    }
}
