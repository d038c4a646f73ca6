//! Fieldroute CLI - Command-line interface
//!
//! Operator front end for route optimization and crew check-ins.

mod cli;
mod commands;
mod errors;
mod output;
mod output_types;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use errors::CliError;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Execute the command
    if let Err(error) = runtime.block_on(commands::execute(cli)) {
        match error.downcast::<CliError>() {
            Ok(cli_error) => cli_error.display(),
            Err(other) => errors::from_anyhow(other).display(),
        }
        std::process::exit(1);
    }

    Ok(())
}
