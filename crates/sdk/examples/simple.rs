//! Simple SDK Example
//!
//! Demonstrates basic usage of the Crawlbyte SDK.
//!
//! # Usage
//!
//! ```bash
//! API_KEY=cb_live_... cargo run --package crawlbyte-sdk --example simple
//! ```

use crawlbyte_sdk::{CrawlbyteClient, TaskSpec};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Crawlbyte SDK - Simple Example");
    println!("==============================\n");

    // 1. Build client from environment
    println!("1. Loading API key from API_KEY...");
    let client = CrawlbyteClient::from_env()?;
    println!("   ✓ Client ready ({})\n", client.tasks_url());

    // 2. Create a task
    println!("2. Creating a universal crawl task...");
    let spec = TaskSpec::universal(["https://example.com"]);
    let task = client.create_task(&spec).await?;

    println!("   ✓ Task created:");
    println!("     - ID: {}", task.id);
    if let Some(status) = task.status() {
        println!("     - Status: {}", status);
    }
    for (key, value) in &task.fields {
        if key != "status" {
            println!("     - {}: {}", key, value);
        }
    }

    println!("\n✓ Example completed successfully!");

    Ok(())
}
