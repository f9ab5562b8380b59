//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the matching command handler.
//! - Turn window and context flags into core types.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()`).

use anyhow::Result;
use dynatrace_config::Config;

use crate::args::{Cli, Commands};
use crate::commands;

/// Dispatch CLI commands to their respective handlers.
pub(crate) async fn run_command(cli: Cli, config: Config) -> Result<()> {
    let output_file = cli.output_file.as_deref();
    match &cli.command {
        Commands::Dashboards => {
            commands::dashboards::run(config, &cli.output, output_file).await?;
        }
        Commands::Slis {
            window,
            stored,
            save_dashboard,
            ..
        } => {
            commands::slis::run(
                config,
                cli.context.delivery_context(),
                window.window()?,
                stored.clone(),
                save_dashboard.clone(),
                &cli.output,
                output_file,
            )
            .await?;
        }
        Commands::Value { name, window } => {
            commands::value::run(
                config,
                cli.context.delivery_context(),
                name,
                window.window()?,
                &cli.output,
                output_file,
            )
            .await?;
        }
    }
    Ok(())
}
