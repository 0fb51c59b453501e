//! Crawlbyte Client Implementation

use crate::config::{self, ClientConfig};
use crate::error::{Result, SdkError};
use crate::types::{TaskResponse, TaskSpec};
use reqwest::header::{HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const TASKS_PATH: &str = "tasks";

/// Crawlbyte API Client
///
/// Cheap to clone; clones share the connection pool and credential.
///
/// # Example
///
/// ```no_run
/// use crawlbyte_sdk::{CrawlbyteClient, TaskSpec};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CrawlbyteClient::new("cb_live_...")?;
/// let task = client
///     .create_task(&TaskSpec::universal(["https://example.com"]))
///     .await?;
/// assert!(task.contains_key("id"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CrawlbyteClient {
    http: reqwest::Client,
    api_key: Arc<SecretString>,
    tasks_url: Url,
}

impl CrawlbyteClient {
    /// Create a client with the default configuration
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Result<Self> {
        Self::with_secret(SecretString::from(api_key.into()), config)
    }

    /// Create a client from an already-wrapped secret
    pub fn with_secret(api_key: SecretString, config: ClientConfig) -> Result<Self> {
        Self::build(api_key, config, true)
    }

    /// `keep_idle = false` disables connection reuse, for callers whose
    /// runtime is not polled between requests.
    pub(crate) fn build(
        api_key: SecretString,
        config: ClientConfig,
        keep_idle: bool,
    ) -> Result<Self> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(SdkError::MissingCredential);
        }

        let tasks_url = tasks_url(&config.base_url)?;

        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| SdkError::Config(format!("Invalid user agent: {}", e)))?;
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);
        if !keep_idle {
            builder = builder.pool_max_idle_per_host(0);
        }
        let http = builder
            .build()
            .map_err(|e| SdkError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: Arc::new(api_key),
            tasks_url,
        })
    }

    /// Build a client from `API_KEY`, `CRAWLBYTE_BASE_URL` and `CRAWLBYTE_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let api_key = config::api_key_from_env()?;
        let config = ClientConfig::from_env()?;
        Self::with_secret(api_key, config)
    }

    /// Endpoint that receives task submissions
    pub fn tasks_url(&self) -> &Url {
        &self.tasks_url
    }

    /// Create a crawl task
    ///
    /// # Arguments
    ///
    /// * `spec` - Task type, seed URLs and any extra fields
    ///
    /// # Errors
    ///
    /// Local validation failures, transport failures and every non-success
    /// status come back as [`SdkError`]. A success reply without an `id` is
    /// reported as [`SdkError::MissingId`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use crawlbyte_sdk::{CrawlbyteClient, TaskSpec};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = CrawlbyteClient::new("cb_live_...")?;
    /// let spec = TaskSpec::new("universal")
    ///     .with_input("https://example.com")
    ///     .with_field("js_render", true);
    /// let task = client.create_task(&spec).await?;
    ///
    /// println!("Task ID: {}", task.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_task(&self, spec: &TaskSpec) -> Result<TaskResponse> {
        spec.validate()?;

        let started = Instant::now();
        debug!(
            task_type = %spec.task_type,
            inputs = spec.input.len(),
            url = %self.tasks_url,
            "Submitting task"
        );

        let response = self
            .http
            .post(self.tasks_url.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(spec)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            // Status decides the error class even if the body is unreadable
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(status = status.as_u16(), error = %e, "Failed to read error body");
                    String::new()
                }
            };
            let err = SdkError::from_status(status, error_message(status, &body));
            warn!(status = status.as_u16(), error = %err, "Task creation failed");
            return Err(err);
        }

        let body = response.text().await?;
        let task = decode_task(&body)?;
        info!(
            task_id = %task.id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Task created"
        );

        Ok(task)
    }
}

fn tasks_url(base_url: &str) -> Result<Url> {
    // Url::join drops the last segment unless the base ends with '/'
    let base = format!("{}/", base_url.trim().trim_end_matches('/'));
    let base = Url::parse(&base)
        .map_err(|e| SdkError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(SdkError::Config(format!(
            "Base URL must use http or https, got '{}'",
            base.scheme()
        )));
    }

    base.join(TASKS_PATH)
        .map_err(|e| SdkError::Config(format!("Invalid base URL '{}': {}", base_url, e)))
}

fn decode_task(body: &str) -> Result<TaskResponse> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(object) => TaskResponse::from_object(object),
        other => Err(SdkError::Decode(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "detail"] {
            match object.get(key) {
                Some(Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(Value::Object(nested)) => {
                    if let Some(Value::String(s)) = nested.get("message") {
                        return s.clone();
                    }
                }
                _ => {}
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("no response body").to_string()
    } else {
        trimmed.to_string()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            CrawlbyteClient::new(""),
            Err(SdkError::MissingCredential)
        ));
        assert!(matches!(
            CrawlbyteClient::new("  \t"),
            Err(SdkError::MissingCredential)
        ));
    }

    #[test]
    fn test_tasks_url_join() {
        assert_eq!(
            tasks_url("https://api.crawlbyte.ai/api").unwrap().as_str(),
            "https://api.crawlbyte.ai/api/tasks"
        );
        assert_eq!(
            tasks_url("http://127.0.0.1:9000/v1/").unwrap().as_str(),
            "http://127.0.0.1:9000/v1/tasks"
        );
        assert!(matches!(tasks_url("not a url"), Err(SdkError::Config(_))));
        assert!(matches!(
            tasks_url("ftp://files.example.com"),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = CrawlbyteClient::new("cb_live_super_secret").unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("cb_live_super_secret"));
    }

    #[test]
    fn test_invalid_spec_fails_before_network() {
        // Unroutable base URL: reaching the network would surface a Transport error
        let config = ClientConfig::default().base_url("http://192.0.2.1:1");
        let client = CrawlbyteClient::with_config("cb_test", config).unwrap();

        let result = tokio_test::block_on(client.create_task(&TaskSpec::new("universal")));
        assert!(matches!(result, Err(SdkError::InvalidSpec(_))));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"input is required"}"#),
            "input is required"
        );
        assert_eq!(
            error_message(
                StatusCode::UNAUTHORIZED,
                r#"{"error":{"message":"invalid api key"}}"#
            ),
            "invalid api key"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::SERVICE_UNAVAILABLE, ""),
            "Service Unavailable"
        );
    }

    #[test]
    fn test_decode_task_shapes() {
        let task = decode_task(r#"{"id":"tsk_1","status":"queued"}"#).unwrap();
        assert_eq!(task.id.as_str(), "tsk_1");

        assert!(matches!(decode_task("[]"), Err(SdkError::Decode(_))));
        assert!(matches!(decode_task("<html>"), Err(SdkError::Decode(_))));
        assert!(matches!(decode_task("{}"), Err(SdkError::MissingId)));
    }
}
