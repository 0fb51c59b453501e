//! Crawlbyte SDK - Rust Client Library
//!
//! Provides a client for submitting crawl tasks to the Crawlbyte API, in
//! async ([`CrawlbyteClient`]) and blocking ([`blocking::CrawlbyteClient`])
//! flavors.
//!
//! # Example
//!
//! ```no_run
//! use crawlbyte_sdk::{CrawlbyteClient, TaskSpec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads API_KEY (and optional CRAWLBYTE_* overrides)
//!     let client = CrawlbyteClient::from_env()?;
//!
//!     let task = client
//!         .create_task(&TaskSpec::universal(["https://example.com"]))
//!         .await?;
//!
//!     println!("Task created: {}", task.id);
//!
//!     Ok(())
//! }
//! ```

pub mod blocking;
mod client;
pub mod config;
mod error;
mod types;

pub use client::CrawlbyteClient;
pub use config::ClientConfig;
pub use error::{Result, SdkError};
pub use types::{TaskId, TaskResponse, TaskSpec, UNIVERSAL};
