//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not build the connection config (see `main()`).

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use dynatrace_client::TimeWindow;
use dynatrace_config::DeliveryContext;

#[derive(Parser)]
#[command(name = "dynatrace-sli")]
#[command(about = "Derive SLIs and SLOs from Dynatrace dashboards and stored queries", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  dynatrace-sli dashboards\n  dynatrace-sli --project sockshop --stage staging --service carts slis --dashboard query --from 2024-01-01T10:00:00Z --to 2024-01-01T10:05:00Z\n  dynatrace-sli --service carts value throughput --from 2024-01-01T10:00:00Z --to 2024-01-01T10:05:00Z -o yaml\n"
)]
pub struct Cli {
    /// Tenant URL (e.g., https://abc12345.live.dynatrace.com)
    #[arg(short, long, global = true, env = "DT_TENANT")]
    pub base_url: Option<String>,

    /// Dynatrace API token
    #[arg(short, long, global = true, env = "DT_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "DT_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true)]
    pub skip_verify: bool,

    /// Proxy URL for all requests
    #[arg(long, global = true, env = "DT_PROXY")]
    pub proxy: Option<String>,

    /// Output format (json, yaml)
    #[arg(short, long, global = true, default_value = "json")]
    pub output: String,

    /// Output file path (saves results to file instead of stdout)
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Serve Prometheus metrics on this address (e.g., 127.0.0.1:9090)
    #[arg(long, global = true, value_name = "ADDR")]
    pub metrics_bind: Option<String>,

    /// `sli.yaml` with custom indicator queries
    #[arg(long, global = true, value_name = "FILE")]
    pub custom_queries: Option<PathBuf>,

    /// `dynatrace.conf.yaml` with the dashboard setting
    #[arg(long, global = true, value_name = "FILE")]
    pub dynatrace_config: Option<PathBuf>,

    #[command(flatten)]
    pub context: ContextArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Delivery coordinates substituted into queries.
#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
    #[arg(long, global = true, default_value = "")]
    pub project: String,

    #[arg(long, global = true, default_value = "")]
    pub stage: String,

    #[arg(long, global = true, default_value = "")]
    pub service: String,

    #[arg(long, global = true, default_value = "")]
    pub deployment: String,

    #[arg(long, global = true, default_value = "")]
    pub test_strategy: String,

    /// Label substituted for `$LABEL.<key>` (repeatable, `key=value`)
    #[arg(long = "label", global = true, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub labels: Vec<(String, String)>,

    /// Custom placeholder filter for `$<key>` (repeatable, `key=value`)
    #[arg(long = "filter", global = true, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,
}

impl ContextArgs {
    pub fn delivery_context(&self) -> DeliveryContext {
        let mut context = DeliveryContext::new(&self.project, &self.stage, &self.service)
            .with_deployment(&self.deployment)
            .with_test_strategy(&self.test_strategy);
        for (key, value) in &self.labels {
            context = context.with_label(key, value);
        }
        context
    }
}

/// Evaluation window bounds.
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Window start (RFC 3339)
    #[arg(long, value_parser = parse_timestamp)]
    pub from: DateTime<Utc>,

    /// Window end (RFC 3339)
    #[arg(long, value_parser = parse_timestamp)]
    pub to: DateTime<Utc>,
}

impl WindowArgs {
    pub fn window(&self) -> anyhow::Result<TimeWindow> {
        if self.to <= self.from {
            anyhow::bail!("--to ({}) must be after --from ({})", self.to, self.from);
        }
        Ok(TimeWindow::new(self.from, self.to))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the dashboards of the tenant
    Dashboards,

    /// Run a dashboard pass and print results, SLI and SLO documents
    Slis {
        /// Dashboard id, or `query` to search by project/stage/service
        #[arg(long, env = "DT_DASHBOARD", default_value = "")]
        dashboard: String,

        #[command(flatten)]
        window: WindowArgs,

        /// Dashboard snapshot stored by a previous pass
        #[arg(long, value_name = "FILE")]
        stored: Option<PathBuf>,

        /// Write the fetched dashboard to this file for the next pass
        #[arg(long, value_name = "FILE")]
        save_dashboard: Option<PathBuf>,
    },

    /// Resolve one indicator value from a custom query or a built-in default
    Value {
        /// Indicator name (e.g., throughput, response_time_p95)
        name: String,

        #[command(flatten)]
        window: WindowArgs,
    },
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}
