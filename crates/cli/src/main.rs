//! Dynatrace SLI CLI - derive SLIs and SLOs from Dynatrace dashboards.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Build the immutable configuration and hand it to the command handlers.
//! - Install logging and the optional Prometheus exporter.
//!
//! Does NOT handle:
//! - REST API calls or SLI derivation (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing to allow `.env` to provide clap defaults.
//! - Logs go to stderr; stdout carries only command output.

mod args;
mod commands;
mod dispatch;
mod error;
mod formatters;
mod metrics_exporter;

use anyhow::{Context, Result};
use args::{Cli, Commands};
use clap::Parser;
use dispatch::run_command;
use dynatrace_config::{Config, ConfigLoader, DynatraceConfigFile, SliFile};
use error::{ExitCode, ExitCodeExt};
use metrics_exporter::MetricsExporter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
    if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }

    let _metrics_exporter = if let Some(ref bind_addr) = cli.metrics_bind {
        match MetricsExporter::install(bind_addr) {
            Ok(exporter) => {
                tracing::info!("Metrics exporter serving http://{}/metrics", exporter.bind_addr());
                Some(exporter)
            }
            Err(e) => {
                eprintln!("Failed to start metrics exporter: {}", e);
                std::process::exit(ExitCode::GeneralError.as_i32());
            }
        }
    } else {
        None
    };

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to build configuration: {:#}", e);
            std::process::exit(e.exit_code().as_i32());
        }
    };

    let exit_code = tokio::select! {
        result = run_command(cli, config) => match result {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("{:#}", e);
                e.exit_code()
            }
        },
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                eprintln!("Failed to listen for Ctrl+C: {}", e);
            }
            eprintln!("Operation cancelled by user");
            ExitCode::Interrupted
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Merge CLI flags, environment and configuration files into a `Config`.
///
/// CLI flags win over environment variables; `dynatrace.conf.yaml` only fills the
/// dashboard setting when neither set it.
fn build_config(cli: &Cli) -> Result<Config> {
    let mut loader = ConfigLoader::new()
        .from_env()
        .context("Failed to load configuration from environment")?;

    if let Some(ref url) = cli.base_url {
        loader = loader.with_tenant(url.clone());
    }
    if let Some(ref token) = cli.api_token {
        loader = loader.with_api_token(token.clone());
    }
    if let Some(timeout_secs) = cli.timeout {
        loader = loader.with_timeout(std::time::Duration::from_secs(timeout_secs));
    }
    if cli.skip_verify {
        loader = loader.with_skip_verify(true);
    }
    if let Some(ref proxy) = cli.proxy {
        loader = loader.with_proxy(proxy.clone());
    }
    if let Commands::Slis { dashboard, .. } = &cli.command {
        if !dashboard.trim().is_empty() {
            loader = loader.with_dashboard(dashboard.clone());
        }
    }
    for (key, value) in &cli.context.filters {
        loader = loader.with_custom_filter(key.clone(), value.clone());
    }

    if let Some(ref path) = cli.dynatrace_config {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        loader = loader.with_dynatrace_config_file(&DynatraceConfigFile::from_yaml(&content)?);
    }
    if let Some(ref path) = cli.custom_queries {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        loader = loader.with_sli_file(&SliFile::from_yaml(&content)?);
    }

    Ok(loader.build()?)
}
