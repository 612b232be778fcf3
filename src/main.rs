use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use lectern_lib::bootstrap::{self, tracing::init_tracing_subscriber};
use lectern_lib::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::resolve_config(cli.config.as_deref())?;
    if let Err(err) = init_tracing_subscriber(Some(&config.data_dir.join("logs"))) {
        eprintln!("Failed to initialize tracing: {err}");
    }
    info!(data_dir = %config.data_dir.display(), resources = config.resources.len(), "lectern starting");

    let deps = bootstrap::wire_dependencies(config)?;

    let result = match cli.command {
        Commands::Acquire { resource, force } => cli::acquire::run(&deps, &resource, force).await,
        Commands::Control { hymnal, bible } => {
            cli::control::run(&deps, hymnal.as_deref(), bible.as_deref()).await
        }
        Commands::Projector => cli::projector::run(&deps).await,
    };

    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "command failed");
    }
    result
}
