//! Crawlbyte CLI - Command-line interface for the Crawlbyte API

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use crawlbyte_sdk::config::DEFAULT_BASE_URL;
use crawlbyte_sdk::{ClientConfig, CrawlbyteClient, TaskResponse, TaskSpec, UNIVERSAL};
use serde_json::Value;
use std::time::Duration;
use tabled::{Table, Tabled};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "crawlbyte")]
#[command(about = "Crawlbyte API CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "CRAWLBYTE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "CRAWLBYTE_TIMEOUT_SECS",
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a crawl task
    Create {
        /// Crawl strategy (e.g., universal)
        #[arg(short = 't', long = "type", default_value = UNIVERSAL)]
        task_type: String,

        /// Seed URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Extra field as KEY=VALUE (VALUE parsed as JSON, else taken as a string)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved client configuration
    Config,
}

#[derive(Tabled)]
struct TaskRow {
    id: String,
    #[tabled(rename = "type")]
    task_type: String,
    inputs: usize,
    status: String,
}

impl TaskRow {
    fn new(task: &TaskResponse, spec: &TaskSpec) -> Self {
        Self {
            id: task.id.to_string(),
            task_type: spec.task_type.clone(),
            inputs: spec.input.len(),
            status: task.status().unwrap_or("-").to_string(),
        }
    }
}

fn parse_field(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

const DEFAULT_LOG_FILTER: &str = "crawlbyte=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `CRAWLBYTE_LOG_FORMAT=json` selects JSON; anything else is pretty
    fn from_setting(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Filter from `RUST_LOG`, falling back to `crawlbyte=info` when unset or invalid
fn env_filter(directives: Option<&str>) -> Result<EnvFilter> {
    directives
        .filter(|d| !d.trim().is_empty())
        .map(EnvFilter::try_new)
        .and_then(|parsed| parsed.ok())
        .map_or_else(|| EnvFilter::try_new(DEFAULT_LOG_FILTER), Ok)
        .context("Failed to create env filter")
}

fn init_logging() -> Result<()> {
    let format = LogFormat::from_setting(std::env::var("CRAWLBYTE_LOG_FORMAT").ok().as_deref());
    let env_filter = env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())?;

    // stderr keeps stdout clean for --json output
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}

fn config_lines(config: &ClientConfig, api_key: Option<&str>) -> Vec<String> {
    let key_state = match api_key.map(str::trim) {
        Some(key) if !key.is_empty() => "set".green(),
        _ => "missing".red(),
    };

    vec![
        format!("  {} {}", "Base URL:".bold(), config.base_url),
        format!("  {} {} seconds", "Timeout:".bold(), config.timeout.as_secs()),
        format!("  {} {}", "User-Agent:".bold(), config.user_agent),
        format!("  {} {}", "API Key:".bold(), key_state),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();

    let config = ClientConfig::default()
        .base_url(cli.base_url.clone())
        .timeout(Duration::from_secs(cli.timeout_secs));

    match cli.command {
        Commands::Create {
            task_type,
            urls,
            fields,
            json,
        } => {
            let api_key = cli
                .api_key
                .context("No API key: pass --api-key or set API_KEY")?;
            let client = CrawlbyteClient::with_config(api_key, config)
                .context("Failed to create client")?;

            let spec = fields.into_iter().fold(
                TaskSpec::new(task_type).with_inputs(urls),
                |spec, (key, value)| spec.with_field(key, value),
            );

            let task = client
                .create_task(&spec)
                .await
                .context("Task creation failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&task.to_value())?);
            } else {
                println!("{}", "✓ Task created successfully".green().bold());
                println!();

                let table = Table::new(vec![TaskRow::new(&task, &spec)]).to_string();
                println!("{}", table);
            }
        }

        Commands::Config => {
            println!("{}", "Client Configuration".cyan().bold());
            println!();
            for line in config_lines(&config, cli.api_key.as_deref()) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
