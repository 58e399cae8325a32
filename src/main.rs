//! Titler - conversation title generation CLI
//!
#![doc = "Titler - conversation title generation CLI"]
#![doc = "Main entry point for the Titler application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use titler::cli::{Cli, Commands};
use titler::commands;
use titler::config::Config;
use titler::storage::SqliteStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Title {
            user,
            conversation,
            text,
            no_client_title,
        } => {
            tracing::info!("Starting title command");
            let args = commands::title::TitleArgs {
                user,
                conversation,
                text,
                no_client_title,
            };
            commands::title::run_title(config, args).await?;
            Ok(())
        }
        Commands::Fallback { text } => {
            commands::fallback::run_fallback(&text);
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            let storage = SqliteStorage::open(config.storage.path.as_deref())?;
            commands::history::handle_history(&storage, command)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "titler=debug" } else { "titler=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
